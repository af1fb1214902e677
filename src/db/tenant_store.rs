// src/db/tenant_store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenant::{TenantSnapshot, TenantUpdates},
};

/// Colaborador de persistência do núcleo de agendamento.
///
/// `commit` é tudo-ou-nada. Clientes e agendamentos chegam com a `version`
/// já incrementada: a gravação só acontece se a versão atual for `version - 1`
/// (agendamento novo = versão 1); caso contrário `AppError::ConcurrentModification`.
/// Ajustes de estoque são relativos (`stock + change`).
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn load_snapshot(&self, tenant_id: Uuid) -> Result<TenantSnapshot, AppError>;

    async fn commit(&self, tenant_id: Uuid, updates: &TenantUpdates) -> Result<(), AppError>;
}
