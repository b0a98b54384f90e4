//! # Synchronization Primitives
//!
//! Um único lock protege todo o escalonamento: o lock global do kernel.
//!
//! ## Regras
//!
//! - Qualquer CPU que varre ou muta a tabela de ambientes o segura.
//! - A CPU nunca o segura enquanto está em halt.
//! - Adquirir de novo na mesma CPU é violação de protocolo (panic).

pub mod kernel_lock;

pub use kernel_lock::{KernelLock, KernelLockGuard};
