//! Core Module
//!
//! Entry point, logging e ferramentas de depuração do kernel, independentes
//! de arquitetura.

pub mod debug;
pub mod entry;
pub mod logging;
