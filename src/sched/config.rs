//! Constantes de configuração do escalonador

/// log2 do número máximo de ambientes
pub const LOG2NENV: u32 = 10;

/// Número máximo de ambientes (slots da tabela)
pub const NENV: usize = 1 << LOG2NENV;

/// Deslocamento da geração dentro do `EnvId`. Precisa ser >= LOG2NENV.
pub const ENVGENSHIFT: u32 = 12;

/// Número máximo de CPUs
#[cfg(feature = "smp")]
pub const NCPU: usize = 8;
#[cfg(not(feature = "smp"))]
pub const NCPU: usize = 1;

/// Tamanho da stack de kernel por CPU
pub const KSTKSIZE: usize = 8 * 4096;

/// Guard gap entre stacks de kernel de CPUs vizinhas
pub const KSTKGAP: usize = 8 * 4096;

/// Topo da stack de kernel da CPU 0 (= KERNBASE)
pub const KSTACKTOP: usize = 0xF000_0000;

/// Topo da stack de kernel da CPU `cpu`; as stacks crescem para baixo.
pub const fn kstack_top(cpu: usize) -> usize {
    KSTACKTOP - cpu * (KSTKSIZE + KSTKGAP)
}

const _: () = assert!(ENVGENSHIFT >= LOG2NENV);
