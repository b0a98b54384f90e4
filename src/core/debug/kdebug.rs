/// Arquivo: core/debug/kdebug.rs
///
/// Propósito: resolver um endereço de código para (arquivo, linha, função).
///
/// Detalhes de Implementação:
/// - Os registros vêm de um carregador de símbolos externo; aqui só existe
///   a busca. Funções e linhas são ordenadas por endereço na construção,
///   então a busca é binária (`partition_point`).
/// - Nada aqui aloca ou trava depois da instalação: pode ser chamado de
///   dentro de um handler de falha.

use alloc::vec::Vec;
use core::fmt;

use spin::Once;

/// Uma função conhecida: `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRecord {
    pub file: &'static str,
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
}

impl FunctionRecord {
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end()
    }
}

/// Entrada da tabela de linhas: primeira instrução da linha `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    pub addr: usize,
    pub line: u32,
}

/// Informação de depuração de um endereço.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EipDebugInfo {
    /// Arquivo fonte
    pub file: &'static str,
    /// Linha (0 se desconhecida)
    pub line: u32,
    /// Nome da função, já sem o sufixo de metadados
    pub fn_name: &'static str,
    /// Endereço de início da função
    pub fn_addr: usize,
}

impl EipDebugInfo {
    /// Placeholder para um frame que nenhum registro cobre.
    ///
    /// `fn_addr = addr` faz o offset impresso ser 0.
    pub const fn unknown(addr: usize) -> Self {
        Self {
            file: "<unknown>",
            line: 0,
            fn_name: "<unknown>",
            fn_addr: addr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolError {
    /// Função com comprimento zero
    EmptyRange { start: usize },
    /// Duas funções cobrindo o mesmo endereço
    Overlap { first: usize, second: usize },
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolError::EmptyRange { start } => {
                write!(f, "empty function range at {:08x}", start)
            }
            SymbolError::Overlap { first, second } => {
                write!(f, "function at {:08x} overlaps {:08x}", first, second)
            }
        }
    }
}

/// Tabela de símbolos ordenada por endereço.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    functions: Vec<FunctionRecord>,
    lines: Vec<LineRecord>,
}

impl SymbolTable {
    /// Tabela sem nenhum registro: toda consulta falha.
    pub const fn empty() -> Self {
        Self {
            functions: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn new(
        mut functions: Vec<FunctionRecord>,
        mut lines: Vec<LineRecord>,
    ) -> Result<Self, SymbolError> {
        functions.sort_unstable_by_key(|f| f.start);
        lines.sort_unstable_by_key(|l| l.addr);

        if let Some(f) = functions.iter().find(|f| f.len == 0) {
            return Err(SymbolError::EmptyRange { start: f.start });
        }
        if let Some(w) = functions.windows(2).find(|w| w[0].end() > w[1].start) {
            return Err(SymbolError::Overlap {
                first: w[0].start,
                second: w[1].start,
            });
        }

        Ok(Self { functions, lines })
    }

    pub fn functions(&self) -> &[FunctionRecord] {
        &self.functions
    }

    /// Resolve `addr`; `None` quando nenhuma função o contém.
    pub fn resolve(&self, addr: usize) -> Option<EipDebugInfo> {
        let idx = self.functions.partition_point(|f| f.start <= addr);
        let func = self.functions[..idx].last()?;
        if !func.contains(addr) {
            return None;
        }

        // Linha mais próxima em ou antes de addr, desde que dentro da função.
        let li = self.lines.partition_point(|l| l.addr <= addr);
        let line = match self.lines[..li].last() {
            Some(l) if l.addr >= func.start => l.line,
            _ => 0,
        };

        Some(EipDebugInfo {
            file: func.file,
            line,
            fn_name: strip_metadata(func.name),
            fn_addr: func.start,
        })
    }
}

/// `"test_backtrace:F(0,18)"` -> `"test_backtrace"`
fn strip_metadata(name: &'static str) -> &'static str {
    match name.find(':') {
        Some(sep) => &name[..sep],
        None => name,
    }
}

// Tabela do kernel, instalada uma vez no boot pelo carregador de símbolos.
static KERNEL_SYMBOLS: Once<SymbolTable> = Once::new();

/// Instala a tabela de símbolos do kernel. Chamadas depois da primeira são
/// ignoradas.
pub fn install_kernel_symbols(table: SymbolTable) -> &'static SymbolTable {
    if KERNEL_SYMBOLS.is_completed() {
        crate::kwarn!("(Debug) Tabela de símbolos já instalada, ignorando");
    }
    let installed = KERNEL_SYMBOLS.call_once(|| table);
    crate::kinfo!("(Debug) Símbolos do kernel: funcs=", installed.functions.len());
    installed
}

pub fn kernel_symbols() -> Option<&'static SymbolTable> {
    KERNEL_SYMBOLS.get()
}

/// Resolve `addr` contra a tabela do kernel.
pub fn debuginfo_eip(addr: usize) -> Option<EipDebugInfo> {
    kernel_symbols()?.resolve(addr)
}
