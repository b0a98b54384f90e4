//! Drivers de saída de diagnóstico.
//!
//! - `serial`: porta COM1, usada pelas macros de log (sem `core::fmt`).
//! - `console`: `fmt::Write` sobre a serial, para backtraces e o monitor.

pub mod console;
pub mod serial;
