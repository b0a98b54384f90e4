//! Cenários do escalonador com uma `Machine` simulada.
//!
//! A máquina de teste registra cada efeito de hardware e, no momento do
//! efeito, o estado do lock do kernel e da CPU.

#![cfg(test)]

use alloc::vec::Vec;

use crate::arch::Machine;
use crate::mm::AddressSpace;
use crate::sched::config::kstack_top;
use crate::sched::core::{sched_yield, CpuStatus, CpuStep, Kernel};
use crate::sched::env::{EnvId, EnvStatus, EnvTable, Trapframe};

const KERN_PGDIR: AddressSpace = AddressSpace::new(0x0011_8000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    LoadAddressSpace(AddressSpace),
    /// Índice do ambiente (guardado em `eax` do trapframe)
    Enter(usize),
    Halt { kstack_top: usize },
    Monitor,
}

/// Snapshot do mundo no instante de um efeito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seen {
    locked: bool,
    cpu0: CpuStatus,
}

struct SimMachine<'k> {
    kernel: &'k Kernel,
    events: Vec<(Event, Seen)>,
}

impl<'k> SimMachine<'k> {
    fn new(kernel: &'k Kernel) -> Self {
        Self {
            kernel,
            events: Vec::new(),
        }
    }

    fn record(&mut self, event: Event) {
        let seen = Seen {
            locked: self.kernel.lock.is_locked(),
            cpu0: self.kernel.cpu(0).status(),
        };
        self.events.push((event, seen));
    }

    fn events(&self) -> Vec<Event> {
        self.events.iter().map(|(e, _)| *e).collect()
    }

    fn seen_at(&self, wanted: Event) -> Seen {
        self.events
            .iter()
            .find(|(e, _)| *e == wanted)
            .map(|(_, s)| *s)
            .unwrap()
    }
}

impl Machine for SimMachine<'_> {
    fn load_address_space(&mut self, aspace: AddressSpace) {
        self.record(Event::LoadAddressSpace(aspace));
    }

    fn enter_env(&mut self, tf: &Trapframe) {
        self.record(Event::Enter(tf.regs.eax as usize));
    }

    fn halt_until_interrupt(&mut self, kstack_top: usize) {
        self.record(Event::Halt { kstack_top });
    }

    fn run_monitor(&mut self) {
        self.record(Event::Monitor);
    }
}

fn pgdir_of(index: usize) -> AddressSpace {
    AddressSpace::new(0x0100_0000 + index * 0x1000)
}

/// Tabela com um ambiente por status; `Free` deixa o slot livre.
fn env_table(statuses: &[EnvStatus]) -> EnvTable {
    let mut envs = EnvTable::new(statuses.len());
    for i in 0..statuses.len() {
        let id = envs.alloc(None, pgdir_of(i)).unwrap();
        envs.lookup_mut(id).unwrap().tf.regs.eax = i as u32;
    }
    for (i, &status) in statuses.iter().enumerate() {
        let id = envs.slot(i).unwrap().id;
        if status == EnvStatus::Free {
            envs.destroy(id, 0).unwrap();
        } else {
            envs.set_status(id, status).unwrap();
        }
    }
    envs
}

fn kernel(statuses: &[EnvStatus]) -> Kernel {
    Kernel::new(1, env_table(statuses), KERN_PGDIR)
}

fn id_at(kernel: &Kernel, index: usize) -> EnvId {
    kernel.lock(0).envs.slot(index).unwrap().id
}

/// Faz de `index` o ambiente rodando na CPU 0.
fn make_current(kernel: &Kernel, index: usize) {
    let id = id_at(kernel, index);
    let mut state = kernel.lock(0);
    let env = state.envs.lookup_mut(id).unwrap();
    env.status = EnvStatus::Running;
    env.cpu = Some(0);
    state.set_current(0, Some(id));
}

/// Uma volta completa, como a entrada de um trap faria.
fn step(kernel: &Kernel, machine: &mut SimMachine<'_>) -> CpuStep {
    kernel.cpu(0).wake();
    let guard = kernel.lock(0);
    sched_yield(kernel, 0, guard, machine)
}

#[test]
fn test_dispatch_after_current_not_index_zero() {
    use EnvStatus::*;
    let kernel = kernel(&[Runnable, Running, Free, Runnable]);
    make_current(&kernel, 1);
    let mut machine = SimMachine::new(&kernel);

    let outcome = step(&kernel, &mut machine);

    assert_eq!(outcome, CpuStep::Ran(id_at(&kernel, 3)));
    assert_eq!(
        machine.events(),
        [Event::LoadAddressSpace(pgdir_of(3)), Event::Enter(3)]
    );
    // Espaço trocado ainda com o lock; entrada no ambiente já sem ele.
    assert!(machine.seen_at(Event::LoadAddressSpace(pgdir_of(3))).locked);
    assert!(!machine.seen_at(Event::Enter(3)).locked);

    let state = kernel.lock(0);
    assert_eq!(state.envs.slot(1).unwrap().status, Runnable);
    assert_eq!(state.envs.slot(3).unwrap().status, Running);
    assert_eq!(state.current(0), Some(id_at_locked(&state.envs, 3)));
}

fn id_at_locked(envs: &EnvTable, index: usize) -> EnvId {
    envs.slot(index).unwrap().id
}

#[test]
fn test_dying_only_takes_hardware_halt() {
    use EnvStatus::*;
    let kernel = kernel(&[Free, Free, Dying, Free]);
    let mut machine = SimMachine::new(&kernel);

    assert_eq!(step(&kernel, &mut machine), CpuStep::Halted);
    assert_eq!(
        machine.events(),
        [
            Event::LoadAddressSpace(KERN_PGDIR),
            Event::Halt { kstack_top: kstack_top(0) },
        ]
    );
    assert!(!machine.events().contains(&Event::Monitor));
}

#[test]
fn test_halt_releases_lock_exactly_once() {
    use EnvStatus::*;
    let kernel = kernel(&[NotRunnable, Running]);
    make_current(&kernel, 1);
    // O atual foi destruído por outra CPU enquanto rodava.
    {
        let id = id_at(&kernel, 1);
        kernel.lock(0).envs.set_status(id, Dying).unwrap();
    }
    let mut machine = SimMachine::new(&kernel);

    assert_eq!(step(&kernel, &mut machine), CpuStep::Halted);

    let at_halt = machine.seen_at(Event::Halt { kstack_top: kstack_top(0) });
    assert!(!at_halt.locked, "lock held while halted");
    assert_eq!(at_halt.cpu0, CpuStatus::Halted);
    assert!(machine.seen_at(Event::LoadAddressSpace(KERN_PGDIR)).locked);

    // Solto uma vez e não readquirido por ninguém.
    assert!(!kernel.lock.is_locked());
    assert_eq!(kernel.lock.holder(), None);
    assert_eq!(kernel.lock(0).current(0), None);

    // A interrupção que acorda a CPU sabe que precisa retomar o lock.
    assert_eq!(kernel.cpu(0).wake(), CpuStatus::Halted);
}

#[test]
fn test_global_idle_enters_monitor_with_lock() {
    use EnvStatus::*;
    let kernel = kernel(&[Free, NotRunnable, Free]);
    let mut machine = SimMachine::new(&kernel);

    assert_eq!(step(&kernel, &mut machine), CpuStep::Monitor);
    assert_eq!(machine.events(), [Event::Monitor]);
    let seen = machine.seen_at(Event::Monitor);
    assert!(seen.locked);
    assert_eq!(seen.cpu0, CpuStatus::Running);
    assert!(!kernel.lock.is_locked());

    // Sem trabalho novo, a próxima volta cai no monitor de novo.
    assert_eq!(step(&kernel, &mut machine), CpuStep::Monitor);
}

#[test]
fn test_no_current_starts_at_zero() {
    use EnvStatus::*;
    let kernel = kernel(&[Runnable, NotRunnable, Runnable]);
    let mut machine = SimMachine::new(&kernel);

    assert_eq!(step(&kernel, &mut machine), CpuStep::Ran(id_at(&kernel, 0)));
}

#[test]
fn test_round_robin_fairness() {
    use EnvStatus::*;
    let statuses = [Runnable, Free, Runnable, NotRunnable, Runnable, Runnable];
    let kernel = kernel(&statuses);
    let mut machine = SimMachine::new(&kernel);

    let runnable = [0, 2, 4, 5];
    let mut order = Vec::new();
    for _ in 0..runnable.len() * 2 {
        match step(&kernel, &mut machine) {
            CpuStep::Ran(id) => order.push(id.index()),
            other => panic!("unexpected {:?}", other),
        }
    }

    // Cada um uma vez por passada, em ordem de índice.
    assert_eq!(order, [0, 2, 4, 5, 0, 2, 4, 5]);
    let state = kernel.lock(0);
    for i in runnable {
        assert_eq!(state.envs.slot(i).unwrap().runs, 2);
    }
    assert_eq!(state.envs.iter().filter(|e| e.status == Running).count(), 1);
}

#[test]
fn test_lone_running_env_is_redispatched() {
    use EnvStatus::*;
    let kernel = kernel(&[NotRunnable, Runnable]);
    let mut machine = SimMachine::new(&kernel);

    let only = id_at(&kernel, 1);
    assert_eq!(step(&kernel, &mut machine), CpuStep::Ran(only));
    assert_eq!(step(&kernel, &mut machine), CpuStep::Ran(only));
    assert_eq!(kernel.lock(0).envs.lookup(only).unwrap().runs, 2);
}

#[test]
fn test_halted_cpu_picks_up_new_work() {
    use EnvStatus::*;
    let kernel = kernel(&[NotRunnable, Dying]);
    let mut machine = SimMachine::new(&kernel);
    assert_eq!(step(&kernel, &mut machine), CpuStep::Halted);

    // Outro caminho do kernel torna o env 0 executável.
    {
        let id = id_at(&kernel, 0);
        kernel.lock(0).envs.set_status(id, Runnable).unwrap();
    }
    assert_eq!(step(&kernel, &mut machine), CpuStep::Ran(id_at(&kernel, 0)));
    assert_eq!(kernel.cpu(0).status(), CpuStatus::Running);
}

#[cfg(feature = "smp")]
#[test]
fn test_env_running_elsewhere_is_not_stolen() {
    use EnvStatus::*;
    let kernel = Kernel::new(2, env_table(&[Runnable]), KERN_PGDIR);
    let mut machine = SimMachine::new(&kernel);

    kernel.cpu(0).wake();
    let guard = kernel.lock(0);
    let id = guard.envs.slot(0).unwrap().id;
    assert_eq!(sched_yield(&kernel, 0, guard, &mut machine), CpuStep::Ran(id));

    // CPU 1 não tem atual; o único env está Running na CPU 0.
    kernel.cpu(1).wake();
    let guard = kernel.lock(1);
    assert_eq!(sched_yield(&kernel, 1, guard, &mut machine), CpuStep::Halted);
    assert_eq!(
        machine.events().last(),
        Some(&Event::Halt { kstack_top: kstack_top(1) })
    );
    assert_eq!(kernel.cpu(1).status(), CpuStatus::Halted);

    let state = kernel.lock(1);
    assert_eq!(state.current(0), Some(id));
    assert_eq!(state.current(1), None);
}
