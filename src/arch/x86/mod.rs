//! Backend i386 (modo protegido, ring 0).

pub mod cpu;
pub mod machine;

pub use cpu::X86Cpu as Cpu;
pub use machine::X86Machine;
