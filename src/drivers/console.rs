//! Console de diagnóstico.
//!
//! Canal de texto append-only, orientado a linhas, para tudo que o operador
//! lê: backtraces, o aviso de sistema ocioso e o prompt do monitor. Diferente
//! das macros de log, aqui usamos `core::fmt`.

use core::fmt;

use super::serial;

/// Escritor sem estado sobre a COM1.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // O monitor fala em '\n'; o terminal serial quer CRLF.
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                serial::emit_nl();
            }
            serial::emit_str(line);
        }
        Ok(())
    }
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    use fmt::Write;
    let _ = Console.write_fmt(args);
}

#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {
        $crate::drivers::console::_print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! kprintln {
    () => ($crate::kprint!("\n"));
    ($fmt:expr) => ($crate::kprint!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::kprint!(concat!($fmt, "\n"), $($arg)*));
}
