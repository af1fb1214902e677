// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Appointments ---
        handlers::appointments::create_appointment,
        handlers::appointments::update_appointment,
        handlers::appointments::eligible_staff,
        handlers::appointments::quote,

        // --- CRM ---
        handlers::crm::eligible_package,
    ),
    components(
        schemas(
            // --- Appointments ---
            models::appointment::AppointmentStatus,
            models::appointment::PaymentMethod,
            models::appointment::Payment,
            models::appointment::Appointment,
            handlers::appointments::SaveAppointmentPayload,
            handlers::appointments::SaveAppointmentResponse,
            handlers::appointments::NoticeView,
            services::pricing::ServiceTotals,

            // --- Catálogo ---
            models::catalog::Staff,
            models::catalog::Service,
            models::catalog::ProfessionalUse,
            models::catalog::Product,

            // --- CRM ---
            models::crm::PurchasedPackage,
            models::crm::PackageCredit,

            // --- Estoque ---
            models::inventory::StockMovement,
            models::inventory::MovementType,
            models::inventory::StockMovementReason,
        )
    ),
    tags(
        (name = "Appointments", description = "Agendamento, pacotes e baixa de estoque"),
        (name = "CRM", description = "Clientes e pacotes pré-pagos")
    )
)]
pub struct ApiDoc;
