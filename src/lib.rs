//! Envkern: escalonador de ambientes e depurador de pilha.
//!
//! Ponto central de exportação dos módulos do kernel.
//!
//! - `sched`: tabela de ambientes, estado por CPU, round-robin e protocolo de halt.
//! - `core::debug`: resolução de símbolos, unwinder de frames e monitor do kernel.
//! - `sync`: o lock global do kernel.
//!
//! A lógica de decisão é pura e roda no host (`cargo test`); apenas o backend
//! `arch::x86` e os itens de runtime (panic handler, alocador global) dependem
//! do alvo bare metal.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// --- Hardware ---
pub mod arch; // HAL (CpuOps, Machine, backend x86)
pub mod drivers; // Serial e console

// --- Núcleo ---
pub mod core; // Logging e ferramentas de depuração
pub mod klib; // Framework de self-test
pub mod mm; // Espaço de endereçamento e heap
pub mod sync; // Lock global do kernel
pub mod sys; // Códigos de erro

// --- Escalonamento ---
pub mod sched;

#[cfg(all(target_arch = "x86", target_os = "none", not(test)))]
mod panic;

pub use crate::sched::core::{CpuId, Kernel, SchedState};
pub use crate::sched::env::{Env, EnvId, EnvStatus, EnvTable};
pub use crate::sys::Errno;
