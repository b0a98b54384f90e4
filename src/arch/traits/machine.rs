//! Efeitos irreversíveis do escalonador.
//!
//! O despacho e o halt são transições de mão única no hardware: a CPU só
//! volta ao kernel por um trap, que reentra o escalonador do topo. A lógica
//! de decisão fica pura e chama estes métodos como último passo.
//!
//! No hardware real `enter_env`, `halt_until_interrupt` nunca retornam.
//! Numa simulação eles retornam quando o "trap" acontece, e o laço do
//! escalonador recomeça, como recomeçaria pelo handler de interrupção.

use crate::mm::AddressSpace;
use crate::sched::env::Trapframe;

pub trait Machine {
    /// Troca o espaço de endereçamento ativo (CR3).
    fn load_address_space(&mut self, aspace: AddressSpace);

    /// Restaura `tf` e entra no ambiente.
    fn enter_env(&mut self, tf: &Trapframe);

    /// Reinicia a pilha em `kstack_top`, habilita interrupções e fica em
    /// `hlt` até uma interrupção. Chamado sem o lock do kernel.
    fn halt_until_interrupt(&mut self, kstack_top: usize);

    /// Roda o monitor do kernel (sistema sem trabalho). Chamado com o lock
    /// do kernel.
    fn run_monitor(&mut self);
}
