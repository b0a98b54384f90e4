//! Lock global do kernel (big kernel lock).
//!
//! `spin::Mutex` com rastreamento da CPU dona. A liberação só acontece pelo
//! drop do guard (ou `release`, que o consome), então liberar duas vezes não
//! é expressável; segurar durante o halt é impedido porque o protocolo de
//! halt recebe o guard por valor.

use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::sched::core::CpuId;

const NO_HOLDER: usize = usize::MAX;

pub struct KernelLock<T> {
    inner: spin::Mutex<T>,
    holder: AtomicUsize,
}

impl<T> KernelLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
            holder: AtomicUsize::new(NO_HOLDER),
        }
    }

    /// Adquire o lock em nome de `cpu`.
    ///
    /// # Panics
    /// Se `cpu` já detém o lock (deadlock garantido).
    pub fn lock(&self, cpu: CpuId) -> KernelLockGuard<'_, T> {
        if self.holding(cpu) {
            crate::kerror!("(Lock) CPU tentou readquirir o lock do kernel. CPU=", cpu);
            panic!("kernel lock: cpu {} already holds it", cpu);
        }

        let guard = self.inner.lock();
        self.holder.store(cpu, Ordering::Relaxed);
        KernelLockGuard {
            guard,
            holder: &self.holder,
            cpu,
        }
    }

    /// Tenta adquirir sem girar.
    pub fn try_lock(&self, cpu: CpuId) -> Option<KernelLockGuard<'_, T>> {
        if self.holding(cpu) {
            return None;
        }
        let guard = self.inner.try_lock()?;
        self.holder.store(cpu, Ordering::Relaxed);
        Some(KernelLockGuard {
            guard,
            holder: &self.holder,
            cpu,
        })
    }

    /// `cpu` é a dona atual?
    pub fn holding(&self, cpu: CpuId) -> bool {
        self.inner.is_locked() && self.holder.load(Ordering::Relaxed) == cpu
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// CPU dona, se houver.
    pub fn holder(&self) -> Option<CpuId> {
        match self.holder.load(Ordering::Relaxed) {
            NO_HOLDER => None,
            cpu => Some(cpu),
        }
    }
}

/// Guard do lock do kernel - libera ao sair do escopo.
pub struct KernelLockGuard<'a, T> {
    guard: spin::MutexGuard<'a, T>,
    holder: &'a AtomicUsize,
    cpu: CpuId,
}

impl<T> KernelLockGuard<'_, T> {
    /// CPU que detém este guard.
    pub fn cpu(&self) -> CpuId {
        self.cpu
    }

    /// Libera explicitamente ("saindo do kernel").
    pub fn release(self) {
        crate::ktrace!("(Lock) Liberando lock do kernel. CPU=", self.cpu);
        drop(self);
    }
}

impl<T> Deref for KernelLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for KernelLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for KernelLockGuard<'_, T> {
    fn drop(&mut self) {
        // O mutex é solto logo depois, quando o campo `guard` é dropado.
        self.holder.store(NO_HOLDER, Ordering::Relaxed);
    }
}
