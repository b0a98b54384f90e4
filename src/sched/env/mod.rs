//! Ambientes (processos escalonáveis) e a tabela que os guarda.

pub mod context;
pub mod id;
pub mod state;
pub mod table;

pub use context::Trapframe;
pub use id::EnvId;
pub use state::EnvStatus;
pub use table::{Destroyed, Env, EnvTable};
