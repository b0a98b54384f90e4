//! Unwinder de frames por frame pointer.
//!
//! ```text
//!   fp + 6w  arg5
//!   ...
//!   fp + 2w  arg1
//!   fp + 1w  endereço de retorno
//!   fp       ebp salvo do chamador  --> próximo frame (0 termina)
//! ```
//!
//! A memória é lida através de `StackMemory`: no kernel leituras voláteis
//! diretas (`RawStack`), fora dele um leitor com limites (`SliceStack`).
//! A lógica do walk é a mesma nos dois casos.

use core::fmt;
use core::mem::size_of;
use core::ptr::NonNull;

use volatile::VolatilePtr;

use super::kdebug::{EipDebugInfo, SymbolTable};

/// Tamanho de uma palavra da pilha.
pub const WORD: usize = size_of::<usize>();

/// Quantos argumentos são mostrados por frame.
pub const FRAME_ARGS: usize = 5;

/// Leitura de palavras da pilha.
pub trait StackMemory {
    /// Palavra em `addr`, ou `None` se o endereço não pode ser lido.
    fn read_word(&self, addr: usize) -> Option<usize>;
}

/// Janela de pilha com limites explícitos: `words[0]` mora em `base`.
#[derive(Debug, Clone, Copy)]
pub struct SliceStack<'a> {
    base: usize,
    words: &'a [usize],
}

impl<'a> SliceStack<'a> {
    pub const fn new(base: usize, words: &'a [usize]) -> Self {
        Self { base, words }
    }
}

impl StackMemory for SliceStack<'_> {
    fn read_word(&self, addr: usize) -> Option<usize> {
        let offset = addr.checked_sub(self.base)?;
        if offset % WORD != 0 {
            return None;
        }
        self.words.get(offset / WORD).copied()
    }
}

/// Pilha do kernel lida diretamente da memória.
///
/// Só rejeita o ponteiro nulo; uma cadeia corrompida pode falhar.
#[derive(Debug)]
pub struct RawStack {
    _private: (),
}

impl RawStack {
    /// # Safety
    /// Todo frame alcançável a partir do frame pointer inicial precisa estar
    /// mapeado e legível enquanto o walk acontece.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl StackMemory for RawStack {
    fn read_word(&self, addr: usize) -> Option<usize> {
        let ptr = NonNull::new(addr as *mut usize)?;
        // SAFETY: contrato de `RawStack::new`.
        let word = unsafe { VolatilePtr::new_read_only(ptr) };
        Some(word.read())
    }
}

/// Um frame da cadeia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame pointer deste frame
    pub ebp: usize,
    /// Endereço de retorno (fp + 1 palavra)
    pub eip: usize,
    pub args: [usize; FRAME_ARGS],
    /// Símbolo do retorno, ou `EipDebugInfo::unknown`
    pub info: EipDebugInfo,
    /// O endereço foi resolvido?
    pub resolved: bool,
}

impl FrameReport {
    /// Distância de `eip` ao início da função.
    pub fn offset(&self) -> usize {
        self.eip.wrapping_sub(self.info.fn_addr)
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ebp {:08x}  eip {:08x}  args", self.ebp, self.eip)?;
        for arg in &self.args {
            write!(f, " {:08x}", arg)?;
        }
        writeln!(f)?;
        write!(
            f,
            "         {}:{}: {}+{:x}",
            self.info.file,
            self.info.line,
            self.info.fn_name,
            self.offset()
        )
    }
}

/// Iterador preguiçoso sobre a cadeia de frames, do mais interno para fora.
pub struct Backtrace<'a, S: StackMemory + ?Sized> {
    stack: &'a S,
    symbols: &'a SymbolTable,
    fp: usize,
}

impl<'a, S: StackMemory + ?Sized> Backtrace<'a, S> {
    /// Começa no frame `fp`. `fp == 0` produz uma sequência vazia.
    pub fn new(stack: &'a S, symbols: &'a SymbolTable, fp: usize) -> Self {
        Self { stack, symbols, fp }
    }
}

impl<S: StackMemory + ?Sized> Iterator for Backtrace<'_, S> {
    type Item = FrameReport;

    fn next(&mut self) -> Option<FrameReport> {
        if self.fp == 0 {
            return None;
        }
        let ebp = self.fp;

        let (saved, eip) = match (
            self.stack.read_word(ebp),
            self.stack.read_word(ebp.wrapping_add(WORD)),
        ) {
            (Some(saved), Some(eip)) => (saved, eip),
            _ => {
                crate::kwarn!("(Debug) Frame ilegível em ebp=", ebp);
                self.fp = 0;
                return None;
            }
        };

        let mut args = [0usize; FRAME_ARGS];
        for (i, arg) in args.iter_mut().enumerate() {
            *arg = self
                .stack
                .read_word(ebp.wrapping_add((2 + i) * WORD))
                .unwrap_or(0);
        }

        let resolved = self.symbols.resolve(eip);
        let report = FrameReport {
            ebp,
            eip,
            args,
            info: resolved.unwrap_or(EipDebugInfo::unknown(eip)),
            resolved: resolved.is_some(),
        };

        self.fp = saved;
        Some(report)
    }
}

/// Imprime o backtrace inteiro a partir de `fp`. Retorna quantos frames
/// foram impressos.
pub fn print_backtrace<W, S>(
    out: &mut W,
    stack: &S,
    symbols: &SymbolTable,
    fp: usize,
) -> Result<usize, fmt::Error>
where
    W: fmt::Write + ?Sized,
    S: StackMemory + ?Sized,
{
    writeln!(out, "Stack backtrace:")?;
    let mut depth = 0;
    for frame in Backtrace::new(stack, symbols, fp) {
        writeln!(out, "{}", frame)?;
        depth += 1;
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debug::kdebug::FunctionRecord;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    const BASE: usize = 0x10_0000;

    fn addr(word: usize) -> usize {
        BASE + word * WORD
    }

    fn symbols() -> SymbolTable {
        SymbolTable::new(
            vec![
                FunctionRecord { file: "kern/init.c", name: "test_backtrace:F(0,18)", start: 0x1000, len: 0x80 },
                FunctionRecord { file: "kern/init.c", name: "i386_init:F(0,25)", start: 0x1100, len: 0x80 },
            ],
            vec![],
        )
        .unwrap()
    }

    /// Três frames encadeados: 0 -> 8 -> 16 -> sentinela.
    fn three_frames() -> [usize; 24] {
        let mut words = [0usize; 24];
        // frame 0
        words[0] = addr(8);
        words[1] = 0x1010;
        words[2..7].copy_from_slice(&[1, 2, 3, 4, 5]);
        // frame 1: retorno fora de toda função conhecida
        words[8] = addr(16);
        words[9] = 0x5000;
        // frame 2
        words[16] = 0;
        words[17] = 0x1120;
        words
    }

    #[test]
    fn test_three_frames_then_stop() {
        let words = three_frames();
        let stack = SliceStack::new(BASE, &words);
        let table = symbols();
        let frames: Vec<_> = Backtrace::new(&stack, &table, addr(0)).collect();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].ebp, addr(0));
        assert_eq!(frames[0].eip, words[1]);
        assert_eq!(frames[1].eip, words[9]);
        assert_eq!(frames[2].eip, words[17]);
        assert_eq!(frames[0].args, [1, 2, 3, 4, 5]);

        assert!(frames[0].resolved);
        assert_eq!(frames[0].info.fn_name, "test_backtrace");
        assert_eq!(frames[0].offset(), 0x10);

        assert!(!frames[1].resolved);
        assert_eq!(frames[1].info, EipDebugInfo::unknown(0x5000));

        assert!(frames[2].resolved);
        assert_eq!(frames[2].info.fn_name, "i386_init");
    }

    #[test]
    fn test_null_start_yields_nothing() {
        let words = three_frames();
        let stack = SliceStack::new(BASE, &words);
        let table = symbols();
        assert_eq!(Backtrace::new(&stack, &table, 0).count(), 0);
    }

    #[test]
    fn test_out_of_bounds_frame_ends_walk() {
        let mut words = three_frames();
        // frame 1 aponta para fora da janela
        words[8] = 0xdead_0000;
        let stack = SliceStack::new(BASE, &words);
        let table = symbols();
        assert_eq!(Backtrace::new(&stack, &table, addr(0)).count(), 2);
    }

    #[test]
    fn test_unreadable_args_show_zero() {
        // Frame no fim da janela: os argumentos caem fora.
        let words = [0usize, 0x1010, 7];
        let stack = SliceStack::new(BASE, &words);
        let table = symbols();
        let frame = Backtrace::new(&stack, &table, BASE).next().unwrap();
        assert_eq!(frame.args, [7, 0, 0, 0, 0]);
    }

    #[test]
    fn test_print_format() {
        let words = three_frames();
        let stack = SliceStack::new(BASE, &words);
        let table = symbols();
        let mut out = String::new();
        let depth = print_backtrace(&mut out, &stack, &table, addr(0)).unwrap();

        assert_eq!(depth, 3);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Stack backtrace:"));
        let first = lines.next().unwrap();
        assert!(first.contains("eip 00001010"));
        assert!(first.ends_with("00000001 00000002 00000003 00000004 00000005"));
        assert_eq!(lines.next().unwrap().trim(), "kern/init.c:0: test_backtrace+10");
        lines.next();
        assert_eq!(lines.next().unwrap().trim(), "<unknown>:0: <unknown>+0");
    }

    #[test]
    fn test_slice_stack_rejects_misaligned() {
        let words = [1usize, 2];
        let stack = SliceStack::new(BASE, &words);
        assert_eq!(stack.read_word(BASE + 1), None);
        assert_eq!(stack.read_word(BASE - WORD), None);
        assert_eq!(stack.read_word(BASE + WORD), Some(2));
    }
}
