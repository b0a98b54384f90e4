//! Protocolo de halt da CPU.
//!
//! Sem trabalho no sistema inteiro (nenhum ambiente Runnable, Running ou
//! Dying) a CPU cai no monitor, ainda com o lock. Caso contrário ela larga
//! o ambiente atual, volta para o espaço de endereçamento do kernel, se
//! marca `Halted`, solta o lock e para até a próxima interrupção.

use crate::arch::Machine;
use crate::sched::env::EnvTable;

use super::scheduler::CpuStep;
use super::{CpuId, Kernel, SchedGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltOutcome {
    /// Ninguém tem trabalho: monitor
    Monitor,
    /// Outra CPU ainda tem (ou terá) trabalho: hlt
    Halt,
}

pub fn halt_decision(envs: &EnvTable) -> HaltOutcome {
    if envs.has_work() {
        HaltOutcome::Halt
    } else {
        HaltOutcome::Monitor
    }
}

/// Para a CPU `cpu`. O guard é consumido: no caminho do hlt ele é solto
/// antes de parar, no caminho do monitor ao sair dele.
pub fn sched_halt<M: Machine + ?Sized>(
    kernel: &Kernel,
    cpu: CpuId,
    mut guard: SchedGuard<'_>,
    machine: &mut M,
) -> CpuStep {
    debug_assert_eq!(guard.cpu(), cpu);

    match halt_decision(&guard.envs) {
        HaltOutcome::Monitor => {
            crate::kinfo!("(Idle) Nenhum ambiente executável. CPU=", cpu);
            crate::kprintln!("No runnable environments in the system!");
            machine.run_monitor();
            drop(guard);
            CpuStep::Monitor
        }
        HaltOutcome::Halt => {
            let info = kernel.cpu(cpu);

            guard.set_current(cpu, None);
            machine.load_address_space(kernel.kern_pgdir());
            info.mark_halted();
            guard.release();

            crate::ktrace!("(Idle) CPU em hlt. CPU=", cpu);
            machine.halt_until_interrupt(info.kstack_top());
            CpuStep::Halted
        }
    }
}
