//! `Machine` sobre o hardware real.

use crate::arch::traits::{CpuOps, Machine};
use crate::core::debug::monitor::{self, Debugger, LineSource};
use crate::core::debug::{kernel_symbols, RawStack, SymbolTable};
use crate::drivers::console::Console;
use crate::mm::AddressSpace;
use crate::sched::env::Trapframe;

use super::cpu::X86Cpu;

static NO_SYMBOLS: SymbolTable = SymbolTable::empty();

/// Máquina x86 com o teclado/serial do operador como entrada do monitor.
pub struct X86Machine<L: LineSource> {
    input: L,
}

impl<L: LineSource> X86Machine<L> {
    pub const fn new(input: L) -> Self {
        Self { input }
    }
}

impl<L: LineSource> Machine for X86Machine<L> {
    fn load_address_space(&mut self, aspace: AddressSpace) {
        // SAFETY: todo page directory de ambiente mapeia o kernel acima de KERNBASE.
        unsafe { X86Cpu::lcr3(aspace) }
    }

    fn enter_env(&mut self, tf: &Trapframe) {
        // SAFETY: o trapframe veio da tabela de ambientes, já com o CR3 do ambiente.
        unsafe { X86Cpu::env_pop_tf(tf) }
    }

    fn halt_until_interrupt(&mut self, kstack_top: usize) {
        // SAFETY: o escalonador não deixa nada vivo na pilha atual neste ponto.
        unsafe { X86Cpu::halt_on_stack(kstack_top) }
    }

    fn run_monitor(&mut self) {
        // SAFETY: a cadeia começa no nosso próprio frame, dentro da pilha do kernel.
        let stack = unsafe { RawStack::new() };
        let dbg = Debugger {
            stack: &stack,
            symbols: kernel_symbols().unwrap_or(&NO_SYMBOLS),
            frame_pointer: X86Cpu::frame_pointer(),
        };
        let _ = monitor::monitor(None, &dbg, &mut self.input, &mut Console);
    }
}
