//! # Escalonador Round-Robin
//!
//! A decisão (`pick_next`) é pura: olha a tabela e o ambiente atual e
//! devolve um `SchedOutcome`. O efeito (`dispatch` + `Machine`) vem depois,
//! em `sched_yield`, ainda sob o lock do kernel até o último momento.
//!
//! ## Ordem de busca
//! A partir do slot seguinte ao ambiente atual até o fim da tabela, depois
//! do início até o slot anterior ao atual. O primeiro `Runnable` ganha.
//! Sem candidato, o atual continua se ainda estiver `Running`; senão a CPU
//! vai para o protocolo de halt.

use crate::arch::Machine;
use crate::mm::AddressSpace;
use crate::sched::env::{EnvId, EnvStatus, EnvTable, Trapframe};
use crate::sys::Errno;

use super::cpu::CpuStatus;
use super::idle::sched_halt;
use super::{CpuId, Kernel, SchedGuard, SchedState};

/// Decisão do escalonador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedOutcome {
    Dispatch(EnvId),
    Halt,
}

/// O que aconteceu numa volta do escalonador nesta CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuStep {
    /// Ambiente despachado (e, em simulação, devolveu a CPU por um trap)
    Ran(EnvId),
    /// CPU parou e foi acordada por uma interrupção
    Halted,
    /// Sistema sem trabalho: o monitor rodou e saiu
    Monitor,
}

/// Escolhe o próximo ambiente para a CPU cujo ambiente atual é `current`.
pub fn pick_next(envs: &EnvTable, current: Option<EnvId>) -> SchedOutcome {
    let n = envs.len();
    let (start, wrap_end) = match current {
        Some(cur) => (cur.index() + 1, cur.index().min(n)),
        None => (0, 0),
    };

    let candidate = (start..n)
        .chain(0..wrap_end)
        .filter_map(|i| envs.slot(i))
        .find(|env| env.status == EnvStatus::Runnable);

    if let Some(env) = candidate {
        return SchedOutcome::Dispatch(env.id);
    }

    // Ninguém mais quer a CPU: o atual segue, se ainda estiver rodando.
    if let Some(cur) = current {
        if envs
            .lookup(cur)
            .is_ok_and(|env| env.status == EnvStatus::Running)
        {
            return SchedOutcome::Dispatch(cur);
        }
    }

    SchedOutcome::Halt
}

/// Tudo que a CPU precisa para entrar no ambiente depois de soltar o lock.
#[derive(Debug, Clone, Copy)]
pub struct DispatchPlan {
    pub env: EnvId,
    pub pgdir: AddressSpace,
    pub tf: Trapframe,
}

/// Registra o despacho de `id` na CPU `cpu` (env_run sem o salto).
///
/// O ambiente atual da CPU, se ainda `Running`, volta a `Runnable`; o alvo
/// vira `Running` e passa a ser o atual da CPU.
pub fn dispatch(state: &mut SchedState, cpu: CpuId, id: EnvId) -> Result<DispatchPlan, Errno> {
    let target = state.envs.lookup(id)?;
    match target.status {
        EnvStatus::Runnable => {}
        EnvStatus::Running if target.cpu == Some(cpu) => {}
        _ => return Err(Errno::Inval),
    }

    if let Some(prev) = state.current(cpu).filter(|&prev| prev != id) {
        if let Ok(env) = state.envs.lookup_mut(prev) {
            if env.status == EnvStatus::Running {
                env.status = EnvStatus::Runnable;
            }
        }
    }

    let env = state.envs.lookup_mut(id)?;
    env.status = EnvStatus::Running;
    env.cpu = Some(cpu);
    env.runs = env.runs.wrapping_add(1);
    let plan = DispatchPlan {
        env: id,
        pgdir: env.pgdir,
        tf: env.tf,
    };
    state.set_current(cpu, Some(id));
    Ok(plan)
}

/// Uma volta do escalonador na CPU `cpu`, que entra com o lock do kernel.
///
/// No despacho o lock é solto antes de entrar no ambiente; no halt o guard
/// passa para o protocolo de halt, que o solta exatamente uma vez.
pub fn sched_yield<M: Machine + ?Sized>(
    kernel: &Kernel,
    cpu: CpuId,
    mut guard: SchedGuard<'_>,
    machine: &mut M,
) -> CpuStep {
    let current = guard.current(cpu);

    let id = match pick_next(&guard.envs, current) {
        SchedOutcome::Dispatch(id) => id,
        SchedOutcome::Halt => return sched_halt(kernel, cpu, guard, machine),
    };

    let plan = match dispatch(&mut guard, cpu, id) {
        Ok(plan) => plan,
        Err(e) => {
            crate::kerror!("(Sched) Despacho recusado, errno=", e.as_usize());
            return sched_halt(kernel, cpu, guard, machine);
        }
    };

    crate::ktrace!("(Sched) Despachando env=", plan.env.as_raw());
    machine.load_address_space(plan.pgdir);
    guard.release();
    machine.enter_env(&plan.tf);
    CpuStep::Ran(plan.env)
}

/// Laço do escalonador de uma CPU.
///
/// Cada volta começa como começaria a entrada de um trap: a CPU se marca
/// `Running` e toma o lock do kernel.
pub fn run_cpu<M: Machine + ?Sized>(kernel: &Kernel, cpu: CpuId, machine: &mut M) -> ! {
    let info = kernel.cpu(cpu);
    crate::kinfo!("(Sched) CPU entrando no escalonador. CPU=", cpu);

    loop {
        if info.wake() == CpuStatus::Halted {
            crate::ktrace!("(Sched) CPU acordada do halt. CPU=", cpu);
        }
        let guard = kernel.lock(cpu);
        if let CpuStep::Monitor = sched_yield(kernel, cpu, guard, machine) {
            crate::kdebug!("(Sched) Monitor encerrado, reentrando. CPU=", cpu);
        }
    }
}
