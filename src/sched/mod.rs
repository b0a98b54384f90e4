//! # Escalonamento de Ambientes
//!
//! - `env`: a tabela de ambientes e seus ids com geração.
//! - `core`: estado por CPU, o round-robin e o protocolo de halt.
//! - `config`: limites de compilação (NENV, NCPU, pilhas de kernel).
//!
//! Todo o estado mutável de escalonamento vive em `core::Kernel`, atrás do
//! lock do kernel, e é passado explicitamente para cada operação.

pub mod config;
pub mod core;
pub mod env;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

mod tests;
