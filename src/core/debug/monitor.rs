//! Monitor do kernel.
//!
//! Interpretador de linha mínimo para inspecionar o kernel quando o sistema
//! fica sem trabalho (ou a partir de um trap). A leitura da linha é externa
//! (`LineSource`); a saída vai para qualquer `fmt::Write`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::backtrace::{print_backtrace, StackMemory};
use super::kdebug::SymbolTable;
use crate::sched::env::Trapframe;

/// Tamanho do buffer de comando (uma linha VGA).
pub const CMDBUF_SIZE: usize = 80;

/// Máximo de tokens por linha, contando o nome do comando.
pub const MAXARGS: usize = 16;

pub const PROMPT: &str = "K> ";

/// Fonte de linhas do operador.
pub trait LineSource {
    /// Mostra `prompt` e lê uma linha. `None` quando a entrada acabou.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// O que o monitor faz depois de um comando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Força a saída do loop
    Exit,
}

/// Estado que os comandos inspecionam.
pub struct Debugger<'a> {
    pub stack: &'a dyn StackMemory,
    pub symbols: &'a SymbolTable,
    /// Frame pointer de onde o `backtrace` começa
    pub frame_pointer: usize,
}

type CommandFn =
    fn(&[&str], &mut dyn fmt::Write, &Debugger<'_>, Option<&Trapframe>) -> Result<Flow, fmt::Error>;

struct Command {
    name: &'static str,
    desc: &'static str,
    func: CommandFn,
}

static COMMANDS: &[Command] = &[
    Command {
        name: "help",
        desc: "Display this list of commands",
        func: mon_help,
    },
    Command {
        name: "backtrace",
        desc: "Show the backtrace of the current kernel stack",
        func: mon_backtrace,
    },
    Command {
        name: "exit",
        desc: "Leave the monitor",
        func: mon_exit,
    },
];

fn mon_help(
    _args: &[&str],
    out: &mut dyn fmt::Write,
    _dbg: &Debugger<'_>,
    _tf: Option<&Trapframe>,
) -> Result<Flow, fmt::Error> {
    for cmd in COMMANDS {
        writeln!(out, "{} - {}", cmd.name, cmd.desc)?;
    }
    Ok(Flow::Continue)
}

fn mon_backtrace(
    _args: &[&str],
    out: &mut dyn fmt::Write,
    dbg: &Debugger<'_>,
    _tf: Option<&Trapframe>,
) -> Result<Flow, fmt::Error> {
    print_backtrace(out, dbg.stack, dbg.symbols, dbg.frame_pointer)?;
    Ok(Flow::Continue)
}

fn mon_exit(
    _args: &[&str],
    _out: &mut dyn fmt::Write,
    _dbg: &Debugger<'_>,
    _tf: Option<&Trapframe>,
) -> Result<Flow, fmt::Error> {
    Ok(Flow::Exit)
}

/// Separa `line` em tokens por espaço em branco.
///
/// `None` se houver mais de `MAXARGS - 1` tokens.
pub fn tokenize(line: &str) -> Option<Vec<&str>> {
    let args: Vec<&str> = line.split_ascii_whitespace().collect();
    if args.len() >= MAXARGS {
        return None;
    }
    Some(args)
}

/// Interpreta uma linha.
pub fn run_command(
    line: &str,
    out: &mut dyn fmt::Write,
    dbg: &Debugger<'_>,
    tf: Option<&Trapframe>,
) -> Result<Flow, fmt::Error> {
    let Some(args) = tokenize(line) else {
        writeln!(out, "Too many arguments (max {})", MAXARGS)?;
        return Ok(Flow::Continue);
    };
    let Some(&name) = args.first() else {
        return Ok(Flow::Continue);
    };

    match COMMANDS.iter().find(|cmd| cmd.name == name) {
        Some(cmd) => (cmd.func)(&args, out, dbg, tf),
        None => {
            writeln!(out, "Unknown command '{}'", name)?;
            Ok(Flow::Continue)
        }
    }
}

/// Loop do monitor. Retorna quando um comando pede `Exit` ou a entrada acaba.
pub fn monitor<L>(
    tf: Option<&Trapframe>,
    dbg: &Debugger<'_>,
    input: &mut L,
    out: &mut dyn fmt::Write,
) -> fmt::Result
where
    L: LineSource + ?Sized,
{
    writeln!(out, "Welcome to the kernel monitor!")?;
    writeln!(out, "Type 'help' for a list of commands.")?;

    if let Some(tf) = tf {
        write!(out, "{}", tf)?;
    }

    while let Some(mut line) = input.read_line(PROMPT) {
        if line.len() > CMDBUF_SIZE {
            crate::kwarn!("(Monitor) Linha truncada, tamanho=", line.len());
            let mut cut = CMDBUF_SIZE;
            while !line.is_char_boundary(cut) {
                cut -= 1;
            }
            line.truncate(cut);
        }
        if run_command(&line, out, dbg, tf)? == Flow::Exit {
            crate::kdebug!("(Monitor) Saindo do monitor");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debug::backtrace::SliceStack;
    use alloc::collections::VecDeque;
    use alloc::string::ToString;

    struct Script(VecDeque<&'static str>);

    impl LineSource for Script {
        fn read_line(&mut self, _prompt: &str) -> Option<String> {
            self.0.pop_front().map(|s| s.to_string())
        }
    }

    fn with_debugger<R>(f: impl FnOnce(&Debugger<'_>) -> R) -> R {
        let words = [0usize, 0x1234];
        let stack = SliceStack::new(0x8000, &words);
        let symbols = SymbolTable::empty();
        let dbg = Debugger {
            stack: &stack,
            symbols: &symbols,
            frame_pointer: 0x8000,
        };
        f(&dbg)
    }

    #[test]
    fn test_tokenize_limits() {
        assert_eq!(tokenize("  help \t").unwrap(), ["help"]);
        assert!(tokenize("").unwrap().is_empty());
        let fifteen = "a ".repeat(MAXARGS - 1);
        assert!(tokenize(&fifteen).is_some());
        let sixteen = "a ".repeat(MAXARGS);
        assert!(tokenize(&sixteen).is_none());
    }

    #[test]
    fn test_unknown_command() {
        with_debugger(|dbg| {
            let mut out = String::new();
            let flow = run_command("frobnicate 1", &mut out, dbg, None).unwrap();
            assert_eq!(flow, Flow::Continue);
            assert_eq!(out, "Unknown command 'frobnicate'\n");
        });
    }

    #[test]
    fn test_backtrace_command() {
        with_debugger(|dbg| {
            let mut out = String::new();
            run_command("backtrace", &mut out, dbg, None).unwrap();
            assert!(out.starts_with("Stack backtrace:\n"));
            assert!(out.contains("eip 00001234"));
            assert!(out.contains("<unknown>:0: <unknown>+0"));
        });
    }

    #[test]
    fn test_loop_exits_on_exit_command() {
        with_debugger(|dbg| {
            let mut input = Script(VecDeque::from(["help", "exit", "help"]));
            let mut out = String::new();
            monitor(None, dbg, &mut input, &mut out).unwrap();
            // O último "help" não foi lido
            assert_eq!(input.0.len(), 1);
            assert!(out.contains("backtrace - Show the backtrace"));
        });
    }

    #[test]
    fn test_loop_prints_trapframe() {
        with_debugger(|dbg| {
            let tf = Trapframe::new_user();
            let mut input = Script(VecDeque::new());
            let mut out = String::new();
            monitor(Some(&tf), dbg, &mut input, &mut out).unwrap();
            assert!(out.contains("TRAP frame"));
        });
    }
}
