//! Entry Point Lógico do Kernel.
//!
//! # Responsabilidades
//! 1. **Early init**: serial e heap, antes de qualquer alocação.
//! 2. **Orquestração**: símbolos de depuração, self-tests e o objeto `Kernel`.
//! 3. **Transição**: cada CPU entra no próprio laço de escalonamento.

use spin::Once;

use crate::arch::Machine;
use crate::core::debug::kdebug::{install_kernel_symbols, SymbolTable};
use crate::mm::AddressSpace;
use crate::sched::config::NENV;
use crate::sched::core::{run_cpu, CpuId, Kernel};
use crate::sched::env::EnvTable;

static KERNEL: Once<Kernel> = Once::new();

/// Serial e heap do kernel.
///
/// # Safety
/// Contrato de `mm::heap::init`: região mapeada, exclusiva, chamada uma vez.
pub unsafe fn early_init(heap_start: *mut u8, heap_size: usize) {
    crate::drivers::serial::init();
    crate::mm::heap::init(heap_start, heap_size);
}

/// Monta o estado de escalonamento. Chamada pela CPU de boot depois de
/// `early_init`; chamadas seguintes devolvem o mesmo `Kernel`.
pub fn init_kernel(ncpu: usize, kern_pgdir: AddressSpace, symbols: SymbolTable) -> &'static Kernel {
    crate::kinfo!("Envkern - Iniciando. CPUs=", ncpu);

    install_kernel_symbols(symbols);

    #[cfg(feature = "self_test")]
    {
        let report = crate::sched::test::run_sched_tests();
        if !report.all_passed() {
            crate::kwarn!("(Boot) Self-tests com falhas=", report.failed);
        }
    }

    let kernel = KERNEL.call_once(|| Kernel::new(ncpu, EnvTable::new(NENV), kern_pgdir));
    crate::kinfo!("(Boot) Tabela de ambientes pronta. NENV=", kernel.lock(0).envs.len());
    kernel
}

pub fn kernel() -> Option<&'static Kernel> {
    KERNEL.get()
}

/// Ponto de entrada de cada CPU (a de boot e as APs) no escalonador.
///
/// # Panics
/// Se chamada antes de `init_kernel`.
pub fn cpu_main<M: Machine>(cpu: CpuId, machine: &mut M) -> ! {
    let Some(kernel) = kernel() else {
        crate::kerror!("(Boot) CPU entrou antes do init. CPU=", cpu);
        panic!("cpu {} entered the scheduler before init_kernel", cpu);
    };
    run_cpu(kernel, cpu, machine)
}
