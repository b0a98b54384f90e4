//! Interface Abstrata de CPU (HAL).
//! Operações de uma CPU que não dependem de estado do kernel.

pub trait CpuOps {
    /// Para a execução da CPU até a próxima interrupção (instrução HLT).
    fn halt();

    /// Dica de spinloop (PAUSE).
    fn relax();

    /// Desabilita interrupções globalmente (CLI).
    fn disable_interrupts();

    /// Habilita interrupções globalmente (STI).
    fn enable_interrupts();

    /// Verifica se as interrupções estão habilitadas.
    fn are_interrupts_enabled() -> bool;

    /// Frame pointer do chamador (EBP), ponto de partida do backtrace.
    fn frame_pointer() -> usize;

    /// Entra em loop infinito de halt com interrupções desabilitadas.
    /// Usado em pânicos irrecuperáveis.
    fn hang() -> ! {
        Self::disable_interrupts();
        loop {
            Self::halt();
        }
    }
}
