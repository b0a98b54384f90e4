//! Heap do kernel.
//!
//! `LockedHeap` do `linked_list_allocator`, registrado como alocador global
//! apenas no alvo bare metal. A tabela de ambientes e a tabela de símbolos
//! vivem aqui.

use linked_list_allocator::LockedHeap;

#[cfg_attr(all(target_arch = "x86", target_os = "none", not(test)), global_allocator)]
pub static HEAP: LockedHeap = LockedHeap::empty();

/// Uso atual do heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub size: usize,
    pub used: usize,
    pub free: usize,
}

/// Entrega a região `[start, start + size)` ao heap.
///
/// # Safety
/// A região deve estar mapeada, ser exclusiva do heap e nunca ser liberada.
/// Só pode ser chamada uma vez.
pub unsafe fn init(start: *mut u8, size: usize) {
    crate::kinfo!("(Heap) Inicializando heap. Base=", start as usize);
    HEAP.lock().init(start, size);
    crate::kinfo!("(Heap) Tamanho=", size);
}

pub fn stats() -> HeapStats {
    let heap = HEAP.lock();
    HeapStats {
        size: heap.size(),
        used: heap.used(),
        free: heap.free(),
    }
}
