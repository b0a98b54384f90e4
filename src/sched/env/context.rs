//! Estado de registradores salvo de um ambiente (layout i386).
//!
//! O layout é ditado pela entrada de trap (externa); o escalonador só guarda
//! e restaura este bloco verbatim no despacho.

use bitflags::bitflags;
use core::fmt;

/// Seletores de segmento de usuário (GDT), com RPL 3.
pub const GD_UT: u16 = 0x18;
pub const GD_UD: u16 = 0x20;

bitflags! {
    /// Bits do EFLAGS que o kernel manipula.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct EFlags: u32 {
        /// Carry
        const CF = 1 << 0;
        /// Zero
        const ZF = 1 << 6;
        /// Trap (single step)
        const TF = 1 << 8;
        /// Interrupt enable
        const IF = 1 << 9;
        /// I/O privilege level (2 bits)
        const IOPL_MASK = 3 << 12;
    }
}

/// Registradores empilhados por `pushal`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushRegs {
    pub edi: u32,
    pub esi: u32,
    pub ebp: u32,
    pub oesp: u32, // Inútil
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    pub eax: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trapframe {
    pub regs: PushRegs,
    pub es: u16,
    pub padding1: u16,
    pub ds: u16,
    pub padding2: u16,
    pub trapno: u32,
    // Abaixo: definido pelo hardware
    pub err: u32,
    pub eip: u32,
    pub cs: u16,
    pub padding3: u16,
    pub eflags: u32,
    // Abaixo: só em troca de anel (user -> kernel)
    pub esp: u32,
    pub ss: u16,
    pub padding4: u16,
}

impl Trapframe {
    /// Trapframe inicial de um ambiente de usuário: segmentos de usuário,
    /// interrupções habilitadas, `eip`/`esp` a cargo de quem carrega o binário.
    pub fn new_user() -> Self {
        Self {
            ds: GD_UD | 3,
            es: GD_UD | 3,
            ss: GD_UD | 3,
            cs: GD_UT | 3,
            eflags: EFlags::IF.bits(),
            ..Self::default()
        }
    }

    pub fn flags(&self) -> EFlags {
        EFlags::from_bits_truncate(self.eflags)
    }
}

impl fmt::Display for Trapframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TRAP frame")?;
        writeln!(
            f,
            "  edi  {:08x}  esi  {:08x}  ebp  {:08x}",
            self.regs.edi, self.regs.esi, self.regs.ebp
        )?;
        writeln!(
            f,
            "  ebx  {:08x}  edx  {:08x}  ecx  {:08x}  eax  {:08x}",
            self.regs.ebx, self.regs.edx, self.regs.ecx, self.regs.eax
        )?;
        writeln!(f, "  trap {:08x}  err  {:08x}", self.trapno, self.err)?;
        writeln!(
            f,
            "  eip  {:08x}  cs   {:04x}  flag {:08x}",
            self.eip, self.cs, self.eflags
        )?;
        writeln!(f, "  esp  {:08x}  ss   {:04x}", self.esp, self.ss)
    }
}
