// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Movimentações de Estoque ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "stock_movement_type", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "lowercase")] // JSON: "in" / "out"
pub enum MovementType {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "stock_movement_reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovementReason {
    #[serde(rename = "Professional Use")]
    ProfessionalUse, // Vira "PROFESSIONAL_USE" no banco
    Purchase,
    Sale,
    Correction,
}

// --- STOCK MOVEMENT (Histórico, só cresce) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    /// Agendamento cuja transição originou a baixa.
    pub appointment_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Sempre positivo; o sentido vem de `movement_type`.
    #[schema(example = 3)]
    pub quantity: i32,
    pub reason: StockMovementReason,
    #[schema(example = "Serviço: Coloração")]
    pub notes: Option<String>,
}

/// Ajuste relativo de saldo. O banco aplica `stock = stock + change`,
/// então duas baixas concorrentes no mesmo produto nunca se perdem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub product_id: Uuid,
    #[schema(example = -3)]
    pub change: i32,
    /// Saldo esperado após o ajuste, calculado sobre o snapshot lido.
    #[schema(example = 7)]
    pub resulting_stock: i32,
}
