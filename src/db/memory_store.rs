// src/db/memory_store.rs
//
// Armazenamento em memória (desenvolvimento e testes). Mesma semântica de
// commit do Postgres: verifica todas as versões antes de aplicar qualquer coisa.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantStore,
    models::tenant::{TenantSnapshot, TenantUpdates},
};

#[derive(Default)]
pub struct InMemoryStore {
    tenants: RwLock<HashMap<Uuid, TenantSnapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carga inicial de um tenant (substitui o que existir).
    #[cfg(test)]
    pub async fn seed(&self, snapshot: TenantSnapshot) {
        self.tenants.write().await.insert(snapshot.tenant_id, snapshot);
    }
}

fn check_versions(current: &TenantSnapshot, updates: &TenantUpdates) -> Result<(), AppError> {
    for client in &updates.clients {
        let stored = current.client(client.id).map(|c| c.version);
        if stored != Some(client.version - 1) {
            return Err(AppError::ConcurrentModification("client"));
        }
    }

    for appointment in &updates.appointments {
        let stored = current.appointment(appointment.id).map(|a| a.version);
        let expected = if appointment.version == 1 { None } else { Some(appointment.version - 1) };
        if stored != expected {
            return Err(AppError::ConcurrentModification("appointment"));
        }
    }

    Ok(())
}

#[async_trait]
impl TenantStore for InMemoryStore {
    async fn load_snapshot(&self, tenant_id: Uuid) -> Result<TenantSnapshot, AppError> {
        let tenants = self.tenants.read().await;
        Ok(tenants
            .get(&tenant_id)
            .cloned()
            .unwrap_or_else(|| TenantSnapshot::new(tenant_id)))
    }

    async fn commit(&self, tenant_id: Uuid, updates: &TenantUpdates) -> Result<(), AppError> {
        let mut tenants = self.tenants.write().await;
        let current = tenants
            .entry(tenant_id)
            .or_insert_with(|| TenantSnapshot::new(tenant_id));

        check_versions(current, updates)?;
        current.apply(updates);
        Ok(())
    }
}
