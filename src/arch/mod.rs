//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a única ponte entre a lógica do escalonador e o hardware.
//!
//! - `traits/`: contratos (`CpuOps`, `Machine`) que o resto do kernel usa.
//! - `x86/`: backend i386 em modo protegido, compilado só no alvo bare metal.
//!
//! No host (testes) só os traits existem; os testes fornecem as próprias
//! implementações de `Machine`.

pub mod traits;

// Seleção de Arquitetura: i386 bare metal
#[cfg(all(target_arch = "x86", target_os = "none"))]
pub mod x86;

#[cfg(all(target_arch = "x86", target_os = "none"))]
pub use x86 as platform;

#[cfg(all(target_arch = "x86", target_os = "none"))]
pub use platform::{Cpu, X86Machine};

pub use traits::*;
