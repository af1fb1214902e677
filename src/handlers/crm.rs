// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::crm::PurchasedPackage,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EligiblePackageQuery {
    pub service_id: Uuid,
}

// GET /api/clients/{client_id}/eligible-package
#[utoipa::path(
    get,
    path = "/api/clients/{client_id}/eligible-package",
    tag = "CRM",
    responses(
        (status = 200, description = "Primeiro pacote com crédito para o serviço (ou null)", body = Option<PurchasedPackage>),
        (status = 404, description = "Cliente não encontrado")
    ),
    params(
        ("client_id" = Uuid, Path, description = "ID do Cliente"),
        EligiblePackageQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID do Salão")
    )
)]
pub async fn eligible_package(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(client_id): Path<Uuid>,
    Query(query): Query<EligiblePackageQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let package = app_state.booking_service
        .eligible_package(tenant.0, client_id, query.service_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(package)))
}
