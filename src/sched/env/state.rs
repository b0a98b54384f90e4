//! Estados de ambiente

/// Estado de um slot da tabela de ambientes.
///
/// ```text
///   Free --alloc--> NotRunnable/Runnable --dispatch--> Running
///   Running --yield/outro despachado--> Runnable
///   Running (em outra CPU) --destroy--> Dying --reap--> Free
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EnvStatus {
    /// Slot livre
    Free = 0,
    /// Destruição pedida enquanto rodava em outra CPU
    Dying = 1,
    /// Pronto para rodar
    Runnable = 2,
    /// Rodando em alguma CPU
    Running = 3,
    /// Existe, mas bloqueado (ex: esperando IPC)
    NotRunnable = 4,
}

impl EnvStatus {
    /// Conta como "há trabalho no sistema" para o protocolo de halt.
    pub const fn has_work(self) -> bool {
        matches!(self, Self::Runnable | Self::Running | Self::Dying)
    }
}
