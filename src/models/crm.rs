// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- PACOTES (Créditos pré-pagos) ---

/// Saldo resgatável de um serviço dentro de um pacote.
/// Entradas vivas sempre têm `quantity > 0`; ao zerar, a entrada é removida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackageCredit {
    pub service_id: Uuid,
    #[schema(example = 4)]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedPackage {
    /// Referência à definição do pacote vendido.
    pub package_id: Uuid,
    #[schema(example = "Pacote 5 Escovas")]
    pub name: String,
    pub remaining_services: Vec<PackageCredit>,
    pub purchased_at: Option<DateTime<Utc>>,
}

impl PurchasedPackage {
    pub fn credit_for(&self, service_id: Uuid) -> Option<&PackageCredit> {
        self.remaining_services
            .iter()
            .find(|c| c.service_id == service_id && c.quantity > 0)
    }
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Maria Souza")]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,

    #[schema(example = 120)]
    pub loyalty_points: i32,

    // Ordem importa: o resgate usa o primeiro pacote elegível.
    #[sqlx(json)]
    #[serde(default)]
    pub purchased_packages: Vec<PurchasedPackage>,

    #[schema(example = "Instagram")]
    pub acquisition_source: Option<String>,
    pub is_active: bool,

    /// Contador de concorrência otimista (incrementado a cada escrita).
    pub version: i64,
}
