// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Profissionais ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440010")]
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Alice")]
    pub name: String,
    /// Nomes dos serviços que o profissional sabe executar (comparação exata).
    #[schema(example = json!(["Corte", "Coloração"]))]
    pub specializations: Vec<String>,
    pub is_active: bool,
    #[schema(example = "4.8")]
    pub rating: Option<Decimal>,
}

impl Staff {
    pub fn can_perform(&self, service_name: &str) -> bool {
        self.specializations.iter().any(|s| s == service_name)
    }
}

// --- Serviços ---

/// Produto consumido pelo profissional ao executar o serviço (não é vendido ao cliente).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalUse {
    pub product_id: Uuid,
    #[schema(example = 3)]
    pub quantity_used: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440020")]
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Corte")]
    pub name: String,
    /// Duração em minutos.
    #[schema(example = 45)]
    pub duration: i32,
    #[schema(example = "80.00")]
    pub price: Decimal,
    #[schema(example = "12.50")]
    pub cost: Decimal,
    #[sqlx(json)]
    #[serde(default)]
    pub professional_use_products: Vec<ProfessionalUse>,
}

// --- Produtos (Estoque) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Tinta 7.0")]
    pub name: String,
    /// Pode ficar negativo: a baixa por uso profissional nunca bloqueia o atendimento.
    #[schema(example = 10)]
    pub stock: i32,
}
