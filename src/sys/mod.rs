//! Definições de sistema.
//!
//! Contém os códigos de erro compartilhados pelo kernel.

pub mod error;

pub use error::Errno;
