//! Implementação i386 das operações de CPU (HAL).
//!
//! # Segurança
//! Assume modo protegido 32-bit em ring 0.

use core::arch::asm;

use crate::arch::traits::cpu::CpuOps;
use crate::mm::AddressSpace;
use crate::sched::env::Trapframe;

/// Bit IF do EFLAGS
const EFLAGS_IF: u32 = 1 << 9;

pub struct X86Cpu;

impl X86Cpu {
    /// Carrega um page directory no CR3.
    ///
    /// # Safety
    /// `aspace` precisa mapear o kernel (código, pilha e dados em uso).
    #[inline]
    pub unsafe fn lcr3(aspace: AddressSpace) {
        asm!("mov cr3, {}", in(reg) aspace.as_usize(), options(nostack, preserves_flags));
    }

    /// Restaura um trapframe e retorna ao ambiente com `iretd`.
    ///
    /// # Safety
    /// `tf` precisa descrever um contexto válido; o CR3 atual já deve ser o
    /// do ambiente.
    pub unsafe fn env_pop_tf(tf: &Trapframe) -> ! {
        asm!(
            "mov esp, {0}",
            "popad",
            "pop es",
            "pop ds",
            "add esp, 8", // trapno e err
            "iretd",
            in(reg) tf as *const Trapframe,
            options(noreturn),
        );
    }

    /// Troca para a pilha `stack_top`, habilita interrupções e fica em `hlt`.
    /// A interrupção que acordar a CPU reentra o kernel pelo trap.
    ///
    /// # Safety
    /// A pilha antiga é abandonada; nada nela pode estar em uso.
    pub unsafe fn halt_on_stack(stack_top: usize) -> ! {
        asm!(
            "mov ebp, 0",
            "mov esp, eax",
            "push 0",
            "push 0",
            "sti",
            "2:",
            "hlt",
            "jmp 2b",
            in("eax") stack_top,
            options(noreturn),
        );
    }
}

impl CpuOps for X86Cpu {
    #[inline]
    fn halt() {
        unsafe {
            asm!("hlt", options(nomem, nostack, preserves_flags));
        }
    }

    #[inline]
    fn relax() {
        unsafe {
            asm!("pause", options(nomem, nostack, preserves_flags));
        }
    }

    #[inline]
    fn disable_interrupts() {
        unsafe {
            asm!("cli", options(nomem, nostack));
        }
    }

    #[inline]
    fn enable_interrupts() {
        unsafe {
            asm!("sti", options(nomem, nostack));
        }
    }

    #[inline]
    fn are_interrupts_enabled() -> bool {
        let eflags: u32;
        unsafe {
            asm!("pushfd", "pop {}", out(reg) eflags, options(nomem, preserves_flags));
        }
        eflags & EFLAGS_IF != 0
    }

    #[inline(always)]
    fn frame_pointer() -> usize {
        let ebp: usize;
        unsafe {
            asm!("mov {}, ebp", out(reg) ebp, options(nomem, nostack, preserves_flags));
        }
        ebp
    }
}
