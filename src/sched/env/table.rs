//! Tabela de ambientes.
//!
//! Array de tamanho fixo, indexado de 0 a N-1; a ordem dos índices é a ordem
//! de busca do round-robin. A tabela inteira vive atrás do lock do kernel
//! (ver `sched::core::SchedState`), então nada aqui é atômico.

use alloc::vec::Vec;

use super::context::Trapframe;
use super::id::EnvId;
use super::state::EnvStatus;
use crate::mm::AddressSpace;
use crate::sched::config::NENV;
use crate::sched::core::CpuId;
use crate::sys::Errno;

/// Bloco de controle de ambiente
#[derive(Debug, Clone)]
pub struct Env {
    /// Registradores salvos, restaurados verbatim no despacho
    pub tf: Trapframe,
    /// Id único (índice + geração)
    pub id: EnvId,
    /// Quem criou este ambiente
    pub parent_id: Option<EnvId>,
    /// Estado atual
    pub status: EnvStatus,
    /// CPU em que rodou por último
    pub cpu: Option<CpuId>,
    /// Quantas vezes foi despachado
    pub runs: u32,
    /// Espaço de endereçamento próprio
    pub pgdir: AddressSpace,
}

impl Env {
    fn empty() -> Self {
        Self {
            tf: Trapframe::default(),
            id: EnvId::from_raw(0),
            parent_id: None,
            status: EnvStatus::Free,
            cpu: None,
            runs: 0,
            pgdir: AddressSpace::new(0),
        }
    }
}

/// Resultado de `EnvTable::destroy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destroyed {
    /// Slot liberado na hora
    Freed,
    /// Rodando em outra CPU: marcado Dying, o reaper libera depois
    Deferred,
}

pub struct EnvTable {
    envs: Vec<Env>,
}

impl EnvTable {
    /// Cria uma tabela com `capacity` slots livres.
    ///
    /// # Panics
    /// Se `capacity` for 0 ou maior que `NENV` (o índice não caberia no id).
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity <= NENV,
            "env table capacity out of range"
        );
        let mut envs = Vec::with_capacity(capacity);
        envs.resize(capacity, Env::empty());
        Self { envs }
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    /// Slot pelo índice, qualquer que seja o estado.
    pub fn slot(&self, index: usize) -> Option<&Env> {
        self.envs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Env> {
        self.envs.iter()
    }

    /// Resolve um id para o ambiente vivo que ele nomeia (envid2env).
    ///
    /// Falha com `BadEnv` se o slot está livre ou se o id é de uma
    /// encarnação anterior do slot.
    pub fn lookup(&self, id: EnvId) -> Result<&Env, Errno> {
        let env = self.envs.get(id.index()).ok_or(Errno::BadEnv)?;
        if env.status == EnvStatus::Free || env.id != id {
            return Err(Errno::BadEnv);
        }
        Ok(env)
    }

    pub fn lookup_mut(&mut self, id: EnvId) -> Result<&mut Env, Errno> {
        let env = self.envs.get_mut(id.index()).ok_or(Errno::BadEnv)?;
        if env.status == EnvStatus::Free || env.id != id {
            return Err(Errno::BadEnv);
        }
        Ok(env)
    }

    /// Reivindica o slot livre de menor índice.
    ///
    /// O ambiente nasce `NotRunnable`; quem carrega o código o torna
    /// `Runnable`.
    pub fn alloc(&mut self, parent: Option<EnvId>, pgdir: AddressSpace) -> Result<EnvId, Errno> {
        let index = self
            .envs
            .iter()
            .position(|env| env.status == EnvStatus::Free)
            .ok_or(Errno::NoFreeEnv)?;

        let env = &mut self.envs[index];
        env.id = EnvId::next_for_slot(env.id, index);
        env.parent_id = parent;
        env.status = EnvStatus::NotRunnable;
        env.cpu = None;
        env.runs = 0;
        env.pgdir = pgdir;
        env.tf = Trapframe::new_user();

        crate::ktrace!("(Env) Alocado env=", env.id.as_raw());
        Ok(env.id)
    }

    pub fn set_status(&mut self, id: EnvId, status: EnvStatus) -> Result<(), Errno> {
        if status == EnvStatus::Free {
            // Liberar passa por destroy/reap.
            return Err(Errno::Inval);
        }
        self.lookup_mut(id)?.status = status;
        Ok(())
    }

    /// Pede a destruição de `id` a partir da CPU `on_cpu`.
    ///
    /// Um ambiente rodando em outra CPU não pode ter o slot reaproveitado
    /// sob os pés dela: vira `Dying` e aquela CPU o entrega ao reaper.
    pub fn destroy(&mut self, id: EnvId, on_cpu: CpuId) -> Result<Destroyed, Errno> {
        let env = self.lookup_mut(id)?;
        if env.status == EnvStatus::Running && env.cpu != Some(on_cpu) {
            env.status = EnvStatus::Dying;
            crate::kdebug!("(Env) Destruição adiada, env roda em outra CPU=", id.as_raw());
            return Ok(Destroyed::Deferred);
        }
        Self::release_slot(env);
        Ok(Destroyed::Freed)
    }

    /// Libera um ambiente `Dying`.
    pub fn reap(&mut self, id: EnvId) -> Result<(), Errno> {
        let env = self.lookup_mut(id)?;
        if env.status != EnvStatus::Dying {
            return Err(Errno::Inval);
        }
        Self::release_slot(env);
        Ok(())
    }

    /// Algum ambiente Runnable, Running ou Dying no sistema?
    pub fn has_work(&self) -> bool {
        self.envs.iter().any(|env| env.status.has_work())
    }

    fn release_slot(env: &mut Env) {
        crate::ktrace!("(Env) Liberando env=", env.id.as_raw());
        // O id fica: a próxima geração do slot é derivada dele.
        env.status = EnvStatus::Free;
        env.parent_id = None;
        env.cpu = None;
    }
}
