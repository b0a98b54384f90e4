//! Estado por CPU.
//!
//! O status é a única parte que outras CPUs (e o handler de interrupção)
//! tocam fora do lock do kernel, por isso é atômico e muda só por `swap`.

use core::sync::atomic::{AtomicU8, Ordering};

use super::CpuId;
use crate::sched::config::kstack_top;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CpuStatus {
    /// Ainda não subiu
    Unused = 0,
    /// Executando código (kernel ou ambiente)
    Running = 1,
    /// Parada em `hlt`, sem o lock do kernel
    Halted = 2,
}

impl CpuStatus {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => CpuStatus::Running,
            2 => CpuStatus::Halted,
            _ => CpuStatus::Unused,
        }
    }
}

#[derive(Debug)]
pub struct CpuInfo {
    id: CpuId,
    status: AtomicU8,
    kstack_top: usize,
}

impl CpuInfo {
    pub const fn new(id: CpuId) -> Self {
        Self {
            id,
            status: AtomicU8::new(CpuStatus::Unused as u8),
            kstack_top: kstack_top(id),
        }
    }

    pub const fn id(&self) -> CpuId {
        self.id
    }

    /// Topo da pilha de kernel desta CPU (onde o halt recomeça).
    pub const fn kstack_top(&self) -> usize {
        self.kstack_top
    }

    pub fn status(&self) -> CpuStatus {
        CpuStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Marca a CPU como parada. Retorna o status anterior.
    pub fn mark_halted(&self) -> CpuStatus {
        CpuStatus::from_u8(self.status.swap(CpuStatus::Halted as u8, Ordering::AcqRel))
    }

    /// Marca a CPU como rodando. Retorna o status anterior: se era `Halted`,
    /// quem acordou precisa readquirir o lock do kernel.
    pub fn wake(&self) -> CpuStatus {
        CpuStatus::from_u8(self.status.swap(CpuStatus::Running as u8, Ordering::AcqRel))
    }
}
