// src/handlers/appointments.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n,
    },
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::{
        appointment::{Appointment, AppointmentDraft, AppointmentStatus, Payment},
        catalog::Staff,
        inventory::StockMovement,
        notice::Notice,
    },
    services::{appointment_service::SaveOutcome, pricing::ServiceTotals},
};

// =============================================================================
//  1. SALVAR (CRIAR / EDITAR)
// =============================================================================

// Os obrigatórios chegam como Option para que a validação de negócio
// devolva a lista completa de campos faltando. `endTime` nunca é aceito.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveAppointmentPayload {
    pub client_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,

    #[serde(default)]
    pub service_ids: Vec<Uuid>,

    #[schema(example = "2025-09-20T10:00:00Z")]
    pub start_time: Option<DateTime<Utc>>,

    pub status: Option<AppointmentStatus>,
    pub payment: Option<Payment>,

    #[validate(range(min = 1, max = 5, message = "A avaliação deve ser de 1 a 5"))]
    pub rating: Option<i16>,

    #[validate(length(max = 2000, message = "Observação muito longa"))]
    pub notes: Option<String>,

    /// Resgatar crédito de pacote (apenas com um único serviço).
    #[serde(default)]
    pub use_package: bool,
}

impl From<SaveAppointmentPayload> for AppointmentDraft {
    fn from(p: SaveAppointmentPayload) -> Self {
        AppointmentDraft {
            client_id: p.client_id,
            staff_id: p.staff_id,
            service_ids: p.service_ids,
            start_time: p.start_time,
            status: p.status,
            payment: p.payment,
            rating: p.rating,
            notes: p.notes,
            use_package: p.use_package,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeView {
    #[schema(example = "PACKAGE_REDEEMED")]
    pub code: String,
    pub message: String,
}

impl NoticeView {
    fn new(notice: &Notice, locale: &Locale) -> Self {
        Self {
            code: notice.code().to_string(),
            message: i18n::notice_message(notice, &locale.0),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveAppointmentResponse {
    pub appointment: Appointment,
    pub stock_movements: Vec<StockMovement>,
    pub notices: Vec<NoticeView>,
}

impl SaveAppointmentResponse {
    fn new(outcome: SaveOutcome, locale: &Locale) -> Self {
        Self {
            notices: outcome.notices.iter().map(|n| NoticeView::new(n, locale)).collect(),
            appointment: outcome.appointment,
            stock_movements: outcome.updates.stock_movements,
        }
    }
}

// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = SaveAppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado", body = SaveAppointmentResponse),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos"),
        (status = 409, description = "Conflito de concorrência")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do Salão")
    )
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<SaveAppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let outcome = app_state.booking_service
        .save_appointment(tenant.0, None, &payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(SaveAppointmentResponse::new(outcome, &locale))))
}

// PUT /api/appointments/{appointment_id}
#[utoipa::path(
    put,
    path = "/api/appointments/{appointment_id}",
    tag = "Appointments",
    request_body = SaveAppointmentPayload,
    responses(
        (status = 200, description = "Agendamento atualizado (estoque baixado se concluído pela primeira vez)", body = SaveAppointmentResponse),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos"),
        (status = 404, description = "Agendamento não encontrado"),
        (status = 409, description = "Conflito de concorrência")
    ),
    params(
        ("appointment_id" = Uuid, Path, description = "ID do Agendamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Salão")
    )
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<SaveAppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let outcome = app_state.booking_service
        .save_appointment(tenant.0, Some(appointment_id), &payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(SaveAppointmentResponse::new(outcome, &locale))))
}

// =============================================================================
//  2. APOIO À TELA DE AGENDAMENTO
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServiceIdsQuery {
    /// IDs separados por vírgula. Vazio = nenhum serviço selecionado.
    pub service_ids: Option<String>,
}

impl ServiceIdsQuery {
    fn parse(&self) -> Result<Vec<Uuid>, ApiError> {
        self.service_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Uuid::parse_str(s)
                    .map_err(|_| ApiError::bad_request(format!("serviceIds inválido: {s}")))
            })
            .collect()
    }
}

// GET /api/appointments/eligible-staff
#[utoipa::path(
    get,
    path = "/api/appointments/eligible-staff",
    tag = "Appointments",
    responses(
        (status = 200, description = "Profissionais ativos que executam todos os serviços", body = Vec<Staff>)
    ),
    params(
        ServiceIdsQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID do Salão")
    )
)]
pub async fn eligible_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ServiceIdsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service_ids = query.parse()?;

    let staff = app_state.booking_service
        .eligible_staff(tenant.0, &service_ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(staff)))
}

// GET /api/appointments/quote
#[utoipa::path(
    get,
    path = "/api/appointments/quote",
    tag = "Appointments",
    responses(
        (status = 200, description = "Duração total (min) e preço total", body = ServiceTotals)
    ),
    params(
        ServiceIdsQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID do Salão")
    )
)]
pub async fn quote(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ServiceIdsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service_ids = query.parse()?;

    let totals = app_state.booking_service
        .quote(tenant.0, &service_ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(totals)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let query = ServiceIdsQuery { service_ids: Some(format!("{a}, {b},")) };

        assert_eq!(query.parse().unwrap(), vec![a, b]);
        assert!(ServiceIdsQuery { service_ids: None }.parse().unwrap().is_empty());
        assert!(ServiceIdsQuery { service_ids: Some("xyz".into()) }.parse().is_err());
    }

    #[test]
    fn payload_ignores_end_time_and_validates_rating() {
        let payload: SaveAppointmentPayload = serde_json::from_value(serde_json::json!({
            "serviceIds": [],
            "endTime": "2030-01-01T00:00:00Z",
            "rating": 9
        }))
        .unwrap();

        assert!(payload.validate().is_err());
        let draft: AppointmentDraft = payload.into();
        assert!(draft.start_time.is_none());
    }
}
