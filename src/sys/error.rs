//! # Códigos de Erro do Kernel
//!
//! Define os códigos de erro retornados pelas operações de ambiente.
//! Segue a numeração clássica do kernel (valores negativos no retorno de syscall).
//!
//! ## Política de Propagação
//! - Falhas de lookup/alocação sobem como `Result<_, Errno>` até o chamador imediato.
//! - Nenhum erro deste núcleo chega a um processo: todos os consumidores são internos.
//! - Violações de invariante (lock, capacidade da tabela) não são `Errno`: são `panic!`.

use core::fmt;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Unspecified = 1, // Erro não especificado
    BadEnv = 2,      // Ambiente inexistente ou id obsoleto
    Inval = 3,       // Parâmetro inválido
    NoMem = 4,       // Sem memória
    NoFreeEnv = 5,   // Tabela de ambientes cheia
    Fault = 6,       // Acesso a memória inválido
}

impl Errno {
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }

    /// Mensagem curta para o log e para o console.
    pub const fn message(self) -> &'static str {
        match self {
            Errno::Unspecified => "unspecified error",
            Errno::BadEnv => "bad environment",
            Errno::Inval => "invalid parameter",
            Errno::NoMem => "out of memory",
            Errno::NoFreeEnv => "out of environments",
            Errno::Fault => "segmentation fault",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
