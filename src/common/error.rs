// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::common::i18n;
use crate::middleware::i18n::Locale;

/// Campo obrigatório de um agendamento que está ausente ou inválido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    Client,
    Staff,
    Services,
    StartTime,
}

impl BookingField {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingField::Client => "clientId",
            BookingField::Staff => "staffId",
            BookingField::Services => "serviceIds",
            BookingField::StartTime => "startTime",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Rejeição do agendamento: não adianta tentar de novo sem corrigir os campos.
    #[error("Agendamento inválido: {0:?}")]
    InvalidBooking(Vec<BookingField>),

    #[error("Agendamento não encontrado: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Cliente não encontrado: {0}")]
    ClientNotFound(Uuid),

    #[error("Serviço não encontrado: {0}")]
    ServiceNotFound(Uuid),

    #[error("Estoque insuficiente para o produto {product_id}: saldo {available}, necessário {requested}")]
    InsufficientStock {
        product_id: Uuid,
        available: i32,
        requested: i32,
    },

    /// Conflito de versão na gravação (outro pedido alterou a mesma linha).
    #[error("Registro alterado concorrentemente: {0}")]
    ConcurrentModification(&'static str),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBooking(_) => StatusCode::BAD_REQUEST,
            AppError::AppointmentNotFound(_)
            | AppError::ClientNotFound(_)
            | AppError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConcurrentModification(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converte para a resposta HTTP, com mensagem no idioma do usuário.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::InvalidBooking(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
                Some(json!({ "fields": names }))
            }
            _ => None,
        };

        ApiError {
            status,
            message: i18n::error_message(self, &locale.0),
            details,
        }
    }
}

// --- Resposta HTTP ---

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_booking_lists_every_field() {
        let err = AppError::InvalidBooking(vec![BookingField::Client, BookingField::StartTime]);
        let api = err.to_api_error(&Locale("en".into()));

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details, Some(json!({ "fields": ["clientId", "startTime"] })));
    }

    #[test]
    fn version_conflict_maps_to_409() {
        let err = AppError::ConcurrentModification("client");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
