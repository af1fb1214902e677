// src/services/appointment_service.rs

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::{AppError, BookingField},
    models::{
        appointment::{Appointment, AppointmentDraft, AppointmentStatus, Payment, PaymentMethod},
        catalog::{Service, Staff},
        crm::Client,
        notice::Notice,
        tenant::{TenantSnapshot, TenantUpdates},
    },
    services::{
        consumption::{self, ConsumptionContext, StockPolicy},
        eligibility,
        package_service,
        pricing,
    },
};

/// Resultado planejado de um salvamento. Nada foi gravado ainda:
/// `updates` deve ser persistido como uma unidade pelo chamador.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub appointment: Appointment,
    pub updates: TenantUpdates,
    pub notices: Vec<Notice>,
}

impl SaveOutcome {
    pub fn package_redeemed(&self) -> bool {
        self.notices.iter().any(|n| matches!(n, Notice::PackageRedeemed { .. }))
    }
}

struct ValidBooking<'s> {
    client: &'s Client,
    staff: &'s Staff,
    services: Vec<&'s Service>,
    start_time: DateTime<Utc>,
}

/// Controlador do ciclo de vida do agendamento: valida, resolve pacote,
/// decide o status e calcula os efeitos colaterais. Puro (sem I/O).
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentService {
    stock_policy: StockPolicy,
}

impl AppointmentService {
    pub fn new(stock_policy: StockPolicy) -> Self {
        Self { stock_policy }
    }

    pub fn save(
        &self,
        snapshot: &TenantSnapshot,
        existing: Option<&Appointment>,
        draft: &AppointmentDraft,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome, AppError> {
        let booking = validate(snapshot, draft)?;

        // 1. Duração/preço -> horário de término (nunca vem do chamador)
        let totals = pricing::aggregate(&booking.services);
        let end_time = booking
            .start_time
            .checked_add_signed(Duration::minutes(totals.total_duration))
            .ok_or_else(|| AppError::InvalidBooking(vec![BookingField::StartTime]))?;

        // 2. Status anterior lido antes de qualquer mutação
        let previous_status = existing.map(|a| a.status);

        // Pacote só cobre os mesmos serviços; trocou o serviço, o Paid herdado não vale
        let settled = existing.filter(|a| a.settled_by_package());
        let same_services = settled.is_some_and(|a| a.service_ids == draft.service_ids);
        let inherited_status = if settled.is_some() && !same_services {
            None
        } else {
            previous_status
        };

        let mut notices = vec![if existing.is_some() {
            Notice::AppointmentUpdated
        } else {
            Notice::AppointmentCreated
        }];
        let mut status = draft.status.or(inherited_status).unwrap_or_default();
        let mut payment = draft.payment.clone();
        let mut updates = TenantUpdates::default();

        // 3. Resgate de pacote
        if draft.use_package && same_services {
            // Crédito já consumido na criação; não resgata de novo
            status = AppointmentStatus::Paid;
            payment = existing.and_then(|a| a.payment.clone());
        } else if draft.use_package && booking.services.len() != 1 {
            notices.push(Notice::PackageRequiresSingleService);
        } else if draft.use_package {
            let service = booking.services[0];
            let redeemed = package_service::find_eligible_package(booking.client, service.id)
                .and_then(|pkg| {
                    package_service::redeem(booking.client, pkg, service.id)
                        .map(|client| (pkg.name.clone(), client))
                });

            match redeemed {
                Some((package_name, client)) => {
                    status = AppointmentStatus::Paid;
                    payment = Some(Payment {
                        method: PaymentMethod::Package,
                        amount: totals.total_price,
                    });
                    notices.push(Notice::PackageRedeemed {
                        package_name,
                        remaining: package_service::remaining_credits(&client, service.id),
                    });
                    updates.clients.push(client);
                }
                None => {
                    tracing::warn!(
                        "Sem crédito de pacote para cliente {} / serviço {}",
                        booking.client.id,
                        service.id
                    );
                    notices.push(Notice::RedemptionUnavailable);
                }
            }
        }

        let appointment_id = existing.map(|a| a.id).unwrap_or_else(Uuid::new_v4);

        // 4. Baixa de estoque (só na entrada em status qualificado)
        let delta = consumption::apply_if_qualifying(
            previous_status,
            status,
            &booking.services,
            &ConsumptionContext {
                tenant_id: snapshot.tenant_id,
                appointment_id,
                date: now,
                inventory: &snapshot.inventory,
            },
        );
        notices.extend(consumption::check_stock(&delta, &snapshot.inventory, self.stock_policy)?);

        // 5. Registro final: tudo substituído pelo rascunho
        let appointment = Appointment {
            id: appointment_id,
            tenant_id: snapshot.tenant_id,
            client_id: booking.client.id,
            staff_id: booking.staff.id,
            service_ids: draft.service_ids.clone(),
            start_time: booking.start_time,
            end_time,
            status,
            payment,
            rating: draft.rating,
            notes: draft.notes.clone(),
            version: existing.map_or(1, |a| a.version + 1),
            created_at: existing.map_or(now, |a| a.created_at),
            updated_at: now,
        };

        updates.appointments.push(appointment.clone());
        updates.stock_adjustments = delta.adjustments;
        updates.stock_movements = delta.movements;

        Ok(SaveOutcome { appointment, updates, notices })
    }
}

/// Coleta TODOS os campos inválidos antes de rejeitar.
fn validate<'s>(
    snapshot: &'s TenantSnapshot,
    draft: &AppointmentDraft,
) -> Result<ValidBooking<'s>, AppError> {
    let mut invalid = Vec::new();

    let client = draft.client_id.and_then(|id| snapshot.client(id));
    if client.is_none() {
        invalid.push(BookingField::Client);
    }

    let services = if draft.service_ids.is_empty() {
        None
    } else {
        snapshot.resolve_services(&draft.service_ids)
    };

    let staff = draft
        .staff_id
        .and_then(|id| snapshot.staff_member(id))
        .filter(|s| eligibility::is_eligible(s, services.as_deref().unwrap_or_default()));
    if staff.is_none() {
        invalid.push(BookingField::Staff);
    }

    if services.is_none() {
        invalid.push(BookingField::Services);
    }
    if draft.start_time.is_none() {
        invalid.push(BookingField::StartTime);
    }

    match (client, staff, services, draft.start_time) {
        (Some(client), Some(staff), Some(services), Some(start_time)) if invalid.is_empty() => {
            Ok(ValidBooking { client, staff, services, start_time })
        }
        _ => Err(AppError::InvalidBooking(invalid)),
    }
}
