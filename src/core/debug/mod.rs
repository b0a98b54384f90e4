//! Ferramentas de depuração do kernel: símbolos, backtrace e monitor.

pub mod backtrace;
pub mod kdebug;
pub mod monitor;

pub use backtrace::{print_backtrace, Backtrace, FrameReport, RawStack, SliceStack, StackMemory};
pub use kdebug::{debuginfo_eip, kernel_symbols, EipDebugInfo, SymbolTable};
pub use monitor::{Debugger, LineSource};
