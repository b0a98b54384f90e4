//! Panic Handler - Tratamento de pânicos do kernel
//!
//! Imprime a mensagem e o backtrace na serial e trava a CPU.

use core::panic::PanicInfo;

use crate::arch::{Cpu, CpuOps};
use crate::core::debug::{kernel_symbols, print_backtrace, RawStack, SymbolTable};
use crate::drivers::console::Console;

static NO_SYMBOLS: SymbolTable = SymbolTable::empty();

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    Cpu::disable_interrupts();

    crate::kerror!("(Panic) KERNEL PANIC");
    match info.location() {
        Some(location) => crate::kprintln!(
            "kernel panic at {}:{}: {}",
            location.file(),
            location.line(),
            info.message()
        ),
        None => crate::kprintln!("kernel panic: {}", info.message()),
    }

    // SAFETY: a cadeia começa no frame deste handler, na pilha do kernel.
    let stack = unsafe { RawStack::new() };
    let symbols = kernel_symbols().unwrap_or(&NO_SYMBOLS);
    let _ = print_backtrace(&mut Console, &stack, symbols, Cpu::frame_pointer());

    Cpu::hang()
}
