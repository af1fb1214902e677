// src/models/appointment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Paid,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
}

impl AppointmentStatus {
    /// Status que contam como "atendimento realizado" (disparam a baixa de estoque).
    pub fn is_qualifying(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Paid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Pix,
    Transfer,
    /// Quitado com crédito de pacote pré-pago.
    Package,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: PaymentMethod,
    #[schema(example = "125.00")]
    pub amount: Decimal,
}

impl Payment {
    pub fn is_package(&self) -> bool {
        self.method == PaymentMethod::Package
    }
}

// --- Agendamento ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub service_ids: Vec<Uuid>,
    pub start_time: DateTime<Utc>,
    /// Sempre derivado: início + soma das durações dos serviços.
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[sqlx(json)]
    pub payment: Option<Payment>,
    #[schema(example = 5)]
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn settled_by_package(&self) -> bool {
        self.payment.as_ref().is_some_and(Payment::is_package)
    }
}

/// Intenção de agendamento vinda do chamador. Os campos obrigatórios são
/// opcionais aqui para que a validação possa nomear todos os que faltam.
#[derive(Debug, Clone, Default)]
pub struct AppointmentDraft {
    pub client_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub payment: Option<Payment>,
    pub rating: Option<i16>,
    pub notes: Option<String>,
    /// Pedido de resgate de crédito de pacote (só vale com exatamente um serviço).
    pub use_package: bool,
}
