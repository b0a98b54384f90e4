//! Gerenciamento de Memória (fatia usada pelo escalonador).
//!
//! Paginação e layout de memória vivem fora deste crate; aqui só existe o
//! handle de espaço de endereçamento que o despacho carrega no CR3, e o heap.

pub mod heap;

use core::fmt;

/// Espaço de endereçamento: endereço físico do page directory.
///
/// O dono é o ambiente (ou o kernel, para `kern_pgdir`); o escalonador só
/// o carrega na CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct AddressSpace(usize);

impl AddressSpace {
    pub const fn new(pgdir_phys: usize) -> Self {
        Self(pgdir_phys)
    }

    /// Valor a ser escrito no CR3.
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pgdir@{:08x}", self.0)
    }
}
