// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Macros de log do kernel, escrevendo APENAS na serial.
//
// - SEM core::fmt - só literais e um valor hexadecimal opcional
// - SEM alocação
// - Nível escolhido em tempo de compilação (features do Cargo)
//
// NÍVEIS:
// - ERROR: violações de invariante, estados que não deveriam existir
// - WARN:  situações suspeitas mas recuperáveis
// - INFO:  fluxo normal (boot, CPU ociosa)
// - DEBUG: decisões do escalonador
// - TRACE: cada despacho, cada frame
//
// FEATURES:
// - no_logs:   nada é emitido
// - log_error: ERROR, WARN
// - log_info:  + INFO
// - log_debug: + DEBUG
// - log_trace: tudo (padrão)
//
// USO:
//   kinfo!("(Sched) CPU ociosa");
//   ktrace!("(Sched) Despachando env=", id.as_raw());
//
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

/// Emissor comum: prefixo + mensagem [+ valor hex] + CRLF.
#[doc(hidden)]
#[macro_export]
macro_rules! __klog {
    ($prefix:expr, $msg:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_nl();
    }};
    ($prefix:expr, $msg:expr, $val:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_hex($val as u64);
        $crate::drivers::serial::emit_nl();
    }};
}

// --- ERROR / WARN: sempre ativos, exceto com no_logs ---

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => { $crate::__klog!($crate::core::logging::P_ERROR, $($t)*) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => { $crate::__klog!($crate::core::logging::P_WARN, $($t)*) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// --- INFO ---

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => { $crate::__klog!($crate::core::logging::P_INFO, $($t)*) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// --- DEBUG ---

#[cfg(all(not(feature = "no_logs"), any(feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => { $crate::__klog!($crate::core::logging::P_DEBUG, $($t)*) };
}

#[cfg(not(all(not(feature = "no_logs"), any(feature = "log_debug", feature = "log_trace"))))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// --- TRACE ---

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => { $crate::__klog!($crate::core::logging::P_TRACE, $($t)*) };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}
