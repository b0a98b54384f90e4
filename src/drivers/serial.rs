// =============================================================================
// SERIAL DRIVER - ZERO OVERHEAD
// =============================================================================
//
// Driver de Porta Serial (COM1) para logging de kernel.
//
// ARQUITETURA:
// - SEM Mutex/Spinlock - escrita direta via I/O ports
// - SEM core::fmt - as macros de log só passam literais e valores imediatos
// - SEM alocação
//
// No host (testes) o mesmo conjunto de funções existe: sob `cfg(test)` os
// bytes vão para o stderr do harness, fora dele são descartados.
//
// NOTA: Não há exclusão mútua entre CPUs. Em SMP os logs podem se intercalar.
//
// =============================================================================

/// Porta de dados da COM1
pub const COM1_DATA: u16 = 0x3F8;

/// Line Status Register da COM1
pub const COM1_STATUS: u16 = 0x3FD;

/// Bit "transmit holding register empty" do LSR
const LSR_TX_READY: u8 = 0x20;

// =============================================================================
// BACKEND BARE METAL (x86 protected mode)
// =============================================================================

#[cfg(all(target_arch = "x86", target_os = "none"))]
mod backend {
    use super::{COM1_DATA, COM1_STATUS, LSR_TX_READY};

    #[inline(always)]
    unsafe fn port_in(port: u16) -> u8 {
        let value: u8;
        core::arch::asm!(
            "in al, dx",
            out("al") value,
            in("dx") port,
            options(nostack, nomem, preserves_flags)
        );
        value
    }

    #[inline(always)]
    unsafe fn port_out(port: u16, value: u8) {
        core::arch::asm!(
            "out dx, al",
            in("al") value,
            in("dx") port,
            options(nostack, nomem, preserves_flags)
        );
    }

    /// Configura 38400 baud, 8N1, FIFO habilitado.
    pub fn init() {
        unsafe {
            port_out(COM1_DATA + 1, 0x00); // Desabilita IRQs
            port_out(COM1_DATA + 3, 0x80); // DLAB
            port_out(COM1_DATA, 0x03); // Divisor 3 (lo)
            port_out(COM1_DATA + 1, 0x00); // (hi)
            port_out(COM1_DATA + 3, 0x03); // 8N1
            port_out(COM1_DATA + 2, 0xC7); // FIFO, limpa, limiar 14 bytes
            port_out(COM1_DATA + 4, 0x0B); // RTS/DSR
        }
    }

    #[inline(always)]
    pub fn emit(byte: u8) {
        unsafe {
            while port_in(COM1_STATUS) & LSR_TX_READY == 0 {
                core::hint::spin_loop();
            }
            port_out(COM1_DATA, byte);
        }
    }
}

// =============================================================================
// BACKEND HOST
// =============================================================================

#[cfg(not(all(target_arch = "x86", target_os = "none")))]
mod backend {
    pub fn init() {}

    #[cfg(test)]
    pub fn emit(byte: u8) {
        use std::io::Write;
        let _ = std::io::stderr().write_all(&[byte]);
    }

    #[cfg(not(test))]
    pub fn emit(_byte: u8) {}
}

// =============================================================================
// API
// =============================================================================

/// Inicializa a porta serial. Deve ser chamada uma vez no early-boot.
pub fn init() {
    backend::init();
}

/// Envia um único byte.
#[inline(always)]
pub fn emit(byte: u8) {
    backend::emit(byte);
}

/// Envia uma string.
#[inline(never)]
pub fn emit_str(s: &str) {
    for byte in s.bytes() {
        emit(byte);
    }
}

/// Envia uma nova linha (CRLF).
pub fn emit_nl() {
    emit(b'\r');
    emit(b'\n');
}

/// Envia um valor em hexadecimal, largura fixa da palavra de máquina.
///
/// Formato: `0x` + 8 dígitos em 32 bits, 16 dígitos em 64 bits.
#[inline(never)]
pub fn emit_hex(value: u64) {
    let digits = core::mem::size_of::<usize>() * 2;
    let value = if digits < 16 { value & 0xFFFF_FFFF } else { value };
    emit(b'0');
    emit(b'x');
    for shift in (0..digits).rev() {
        emit(nibble_to_ascii(((value >> (shift * 4)) & 0xF) as u8));
    }
}

/// Converte nibble (0-15) para ASCII ('0'-'9', 'A'-'F').
#[inline(always)]
const fn nibble_to_ascii(n: u8) -> u8 {
    if n < 10 {
        b'0' + n
    } else {
        b'A' + (n - 10)
    }
}
