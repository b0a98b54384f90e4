//! Identificador de ambiente.
//!
//! ```text
//!  31 (sinal)     ENVGENSHIFT        LOG2NENV        0
//!  +-----------------+-----------------+-------------+
//!  |    geração      |   (sempre 0)    |   índice    |
//!  +-----------------+-----------------+-------------+
//! ```
//!
//! A geração muda toda vez que o slot é realocado, então um id guardado de
//! uma encarnação anterior do slot não bate mais com `Env::id`.

use core::fmt;

use crate::sched::config::{ENVGENSHIFT, NENV};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EnvId(i32);

impl EnvId {
    /// Id 0: "o ambiente atual" na convenção das syscalls.
    pub const CURRENT: EnvId = EnvId(0);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// Índice do slot na tabela (ENVX).
    pub const fn index(self) -> usize {
        (self.0 as usize) & (NENV - 1)
    }

    pub const fn generation(self) -> i32 {
        self.0 >> ENVGENSHIFT
    }

    /// Próximo id para o slot `index`, cuja encarnação anterior foi `prev`.
    pub(crate) fn next_for_slot(prev: EnvId, index: usize) -> EnvId {
        let mut generation = prev.0.wrapping_add(1 << ENVGENSHIFT) & !((NENV as i32) - 1);
        if generation <= 0 {
            // Não produzimos ids negativos (são códigos de erro).
            generation = 1 << ENVGENSHIFT;
        }
        EnvId(generation | index as i32)
    }
}

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
