//! Núcleo do escalonador: estado por CPU, round-robin e halt.

pub mod cpu;
pub mod idle;
pub mod scheduler;

pub use cpu::{CpuInfo, CpuStatus};
pub use idle::{halt_decision, sched_halt, HaltOutcome};
pub use scheduler::{dispatch, pick_next, run_cpu, sched_yield, CpuStep, DispatchPlan, SchedOutcome};

use alloc::vec::Vec;

use crate::mm::AddressSpace;
use crate::sched::config::NCPU;
use crate::sched::env::{EnvId, EnvTable};
use crate::sync::{KernelLock, KernelLockGuard};

/// Índice de CPU (0..NCPU).
pub type CpuId = usize;

/// Tudo que só muda com o lock do kernel.
pub struct SchedState {
    pub envs: EnvTable,
    curenv: Vec<Option<EnvId>>,
}

impl SchedState {
    pub fn new(envs: EnvTable, ncpu: usize) -> Self {
        let mut curenv = Vec::with_capacity(ncpu);
        curenv.resize(ncpu, None);
        Self { envs, curenv }
    }

    /// Ambiente atual da CPU `cpu` (`None` se ociosa).
    pub fn current(&self, cpu: CpuId) -> Option<EnvId> {
        self.curenv.get(cpu).copied().flatten()
    }

    pub fn set_current(&mut self, cpu: CpuId, env: Option<EnvId>) {
        self.curenv[cpu] = env;
    }
}

pub type SchedGuard<'a> = KernelLockGuard<'a, SchedState>;

/// O objeto de escalonamento do kernel, passado explicitamente.
pub struct Kernel {
    pub lock: KernelLock<SchedState>,
    cpus: Vec<CpuInfo>,
    kern_pgdir: AddressSpace,
}

impl Kernel {
    /// # Panics
    /// Se `ncpu` for 0 ou maior que `NCPU`.
    pub fn new(ncpu: usize, envs: EnvTable, kern_pgdir: AddressSpace) -> Self {
        assert!(ncpu > 0 && ncpu <= NCPU, "cpu count out of range");
        Self {
            lock: KernelLock::new(SchedState::new(envs, ncpu)),
            cpus: (0..ncpu).map(CpuInfo::new).collect(),
            kern_pgdir,
        }
    }

    /// Adquire o lock do kernel em nome de `cpu`.
    pub fn lock(&self, cpu: CpuId) -> SchedGuard<'_> {
        self.lock.lock(cpu)
    }

    pub fn cpu(&self, id: CpuId) -> &CpuInfo {
        &self.cpus[id]
    }

    pub fn cpus(&self) -> &[CpuInfo] {
        &self.cpus
    }

    pub fn ncpu(&self) -> usize {
        self.cpus.len()
    }

    /// Espaço de endereçamento do próprio kernel.
    pub fn kern_pgdir(&self) -> AddressSpace {
        self.kern_pgdir
    }
}
