// src/services/booking_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantStore,
    models::{
        appointment::AppointmentDraft,
        catalog::{Service, Staff},
        crm::PurchasedPackage,
        tenant::TenantSnapshot,
    },
    services::{
        appointment_service::{AppointmentService, SaveOutcome},
        eligibility, package_service,
        pricing::{self, ServiceTotals},
    },
};

/// Orquestra I/O em volta do núcleo puro: carrega o snapshot do tenant,
/// planeja a operação e grava o patch numa única transação.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn TenantStore>,
    appointments: AppointmentService,
}

impl BookingService {
    pub fn new(store: Arc<dyn TenantStore>, appointments: AppointmentService) -> Self {
        Self { store, appointments }
    }

    /// Cria (`appointment_id = None`) ou atualiza um agendamento.
    ///
    /// Em conflito de versão, recarrega e replaneja uma vez: se o concorrente
    /// consumiu o crédito do pacote, o replanejamento cai no caminho "sem crédito".
    pub async fn save_appointment(
        &self,
        tenant_id: Uuid,
        appointment_id: Option<Uuid>,
        draft: &AppointmentDraft,
    ) -> Result<SaveOutcome, AppError> {
        let mut replanned = false;

        loop {
            let snapshot = self.store.load_snapshot(tenant_id).await?;
            let existing = match appointment_id {
                Some(id) => Some(snapshot.appointment(id).ok_or(AppError::AppointmentNotFound(id))?),
                None => None,
            };

            let outcome = self.appointments.save(&snapshot, existing, draft, Utc::now())?;

            match self.store.commit(tenant_id, &outcome.updates).await {
                Ok(()) => {
                    tracing::info!(
                        "Agendamento {} salvo ({:?}, {} movimentações de estoque, pacote: {})",
                        outcome.appointment.id,
                        outcome.appointment.status,
                        outcome.updates.stock_movements.len(),
                        outcome.package_redeemed()
                    );
                    return Ok(outcome);
                }
                Err(AppError::ConcurrentModification(entity)) if !replanned => {
                    tracing::warn!("Conflito de versão em '{}'; replanejando", entity);
                    replanned = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn eligible_staff(
        &self,
        tenant_id: Uuid,
        service_ids: &[Uuid],
    ) -> Result<Vec<Staff>, AppError> {
        let snapshot = self.store.load_snapshot(tenant_id).await?;
        let services = resolve(&snapshot, service_ids)?;

        Ok(eligibility::eligible_staff(&snapshot.staff, &services)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn quote(&self, tenant_id: Uuid, service_ids: &[Uuid]) -> Result<ServiceTotals, AppError> {
        let snapshot = self.store.load_snapshot(tenant_id).await?;
        let services = resolve(&snapshot, service_ids)?;
        Ok(pricing::aggregate(&services))
    }

    pub async fn eligible_package(
        &self,
        tenant_id: Uuid,
        client_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<PurchasedPackage>, AppError> {
        let snapshot = self.store.load_snapshot(tenant_id).await?;
        let client = snapshot.client(client_id).ok_or(AppError::ClientNotFound(client_id))?;
        Ok(package_service::find_eligible_package(client, service_id).cloned())
    }
}

fn resolve<'s>(snapshot: &'s TenantSnapshot, ids: &[Uuid]) -> Result<Vec<&'s Service>, AppError> {
    ids.iter()
        .map(|id| snapshot.service(*id).ok_or(AppError::ServiceNotFound(*id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::common::fixtures::{at, client, package, product, service_using, staff, TENANT};
    use crate::db::InMemoryStore;
    use crate::models::{
        appointment::AppointmentStatus, inventory::MovementType, notice::Notice,
        tenant::TenantUpdates,
    };

    struct Salon {
        store: Arc<InMemoryStore>,
        booking: BookingService,
        client_id: Uuid,
        staff_id: Uuid,
        cut: Uuid,
        color: Uuid,
        dye: Uuid,
    }

    async fn salon() -> Salon {
        let dye = product("Tinta", 10);
        let cut = service_using("Haircut", 30, 50, &[]);
        let color = service_using("Color", 45, 120, &[(dye.id, 3)]);
        let stylist = staff("Bruno", &["Haircut", "Color"]);
        let maria = client("Maria", vec![package("Pacote Corte", &[(cut.id, 1)])]);

        let mut snapshot = TenantSnapshot::new(TENANT);
        let salon_ids = (maria.id, stylist.id, cut.id, color.id, dye.id);
        snapshot.clients.push(maria);
        snapshot.staff.push(stylist);
        snapshot.services.extend([cut, color]);
        snapshot.inventory.push(dye);

        let store = Arc::new(InMemoryStore::new());
        store.seed(snapshot).await;

        Salon {
            booking: BookingService::new(store.clone(), AppointmentService::default()),
            store,
            client_id: salon_ids.0,
            staff_id: salon_ids.1,
            cut: salon_ids.2,
            color: salon_ids.3,
            dye: salon_ids.4,
        }
    }

    fn draft(s: &Salon, services: &[Uuid]) -> AppointmentDraft {
        AppointmentDraft {
            client_id: Some(s.client_id),
            staff_id: Some(s.staff_id),
            service_ids: services.to_vec(),
            start_time: Some(at("2025-09-20T10:00:00Z")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn saved_appointment_reloads_identically() {
        let s = salon().await;

        let out = s.booking.save_appointment(TENANT, None, &draft(&s, &[s.cut, s.color])).await.unwrap();

        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        let stored = snapshot.appointment(out.appointment.id).unwrap();
        assert_eq!(stored.service_ids, vec![s.cut, s.color]);
        assert_eq!(stored.start_time, at("2025-09-20T10:00:00Z"));
        assert_eq!(stored.end_time, at("2025-09-20T11:15:00Z"));
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
    }

    #[tokio::test]
    async fn completing_then_paying_deducts_stock_once() {
        let s = salon().await;
        let created = s.booking.save_appointment(TENANT, None, &draft(&s, &[s.color])).await.unwrap();

        let mut d = draft(&s, &[s.color]);
        d.status = Some(AppointmentStatus::Completed);
        s.booking.save_appointment(TENANT, Some(created.appointment.id), &d).await.unwrap();

        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        assert_eq!(snapshot.product(s.dye).unwrap().stock, 7);
        assert_eq!(snapshot.stock_movements.len(), 1);
        assert_eq!(snapshot.stock_movements[0].quantity, 3);
        assert_eq!(snapshot.stock_movements[0].movement_type, MovementType::Out);

        d.status = Some(AppointmentStatus::Paid);
        let paid = s.booking.save_appointment(TENANT, Some(created.appointment.id), &d).await.unwrap();

        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        assert_eq!(paid.appointment.status, AppointmentStatus::Paid);
        assert_eq!(snapshot.product(s.dye).unwrap().stock, 7);
        assert_eq!(snapshot.stock_movements.len(), 1);
    }

    #[tokio::test]
    async fn package_booking_commits_credit_and_paid_status() {
        let s = salon().await;
        let mut d = draft(&s, &[s.cut]);
        d.use_package = true;

        let out = s.booking.save_appointment(TENANT, None, &d).await.unwrap();

        assert_eq!(out.appointment.status, AppointmentStatus::Paid);
        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        let maria = snapshot.client(s.client_id).unwrap();
        assert!(maria.purchased_packages[0].remaining_services.is_empty());
        assert!(s.booking.eligible_package(TENANT, s.client_id, s.cut).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_appointment_is_not_found() {
        let s = salon().await;
        let id = Uuid::new_v4();

        let err = s.booking.save_appointment(TENANT, Some(id), &draft(&s, &[s.cut])).await.unwrap_err();

        assert!(matches!(err, AppError::AppointmentNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn lookups_for_the_booking_screen() {
        let s = salon().await;

        let staff = s.booking.eligible_staff(TENANT, &[s.cut, s.color]).await.unwrap();
        assert_eq!(staff.len(), 1);

        let totals = s.booking.quote(TENANT, &[s.cut, s.color]).await.unwrap();
        assert_eq!(totals.total_duration, 75);

        let err = s.booking.quote(TENANT, &[Uuid::new_v4()]).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceNotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_completions_on_the_same_product_both_apply() {
        let s = salon().await;
        let mut d = draft(&s, &[s.color]);
        d.status = Some(AppointmentStatus::Completed);

        // Os dois pedidos planejam sobre o mesmo snapshot (saldo 10)
        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        let first = AppointmentService::default().save(&snapshot, None, &d, Utc::now()).unwrap();
        let second = AppointmentService::default().save(&snapshot, None, &d, Utc::now()).unwrap();

        s.store.commit(TENANT, &first.updates).await.unwrap();
        s.store.commit(TENANT, &second.updates).await.unwrap();

        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        assert_eq!(snapshot.product(s.dye).unwrap().stock, 4);
        assert_eq!(snapshot.stock_movements.len(), 2);
        assert!(snapshot.stock_movements.iter().all(|m| m.quantity == 3));
    }

    /// Simula outro pedido que resgata o mesmo crédito entre o load e o commit.
    struct RacingStore {
        inner: Arc<InMemoryStore>,
        rival: Mutex<Option<TenantUpdates>>,
    }

    #[async_trait]
    impl TenantStore for RacingStore {
        async fn load_snapshot(&self, tenant_id: Uuid) -> Result<TenantSnapshot, AppError> {
            self.inner.load_snapshot(tenant_id).await
        }

        async fn commit(&self, tenant_id: Uuid, updates: &TenantUpdates) -> Result<(), AppError> {
            if let Some(rival) = self.rival.lock().await.take() {
                self.inner.commit(tenant_id, &rival).await?;
            }
            self.inner.commit(tenant_id, updates).await
        }
    }

    #[tokio::test]
    async fn losing_a_credit_race_falls_back_without_negative_balance() {
        let s = salon().await;
        let mut d = draft(&s, &[s.cut]);
        d.use_package = true;

        // O rival planeja sobre o mesmo snapshot e grava primeiro
        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        let rival = AppointmentService::default().save(&snapshot, None, &d, Utc::now()).unwrap();
        let racing = RacingStore { inner: s.store.clone(), rival: Mutex::new(Some(rival.updates)) };
        let booking = BookingService::new(Arc::new(racing), AppointmentService::default());

        let out = booking.save_appointment(TENANT, None, &d).await.unwrap();

        assert_eq!(out.appointment.status, AppointmentStatus::Scheduled);
        assert!(out.notices.contains(&Notice::RedemptionUnavailable));
        let snapshot = s.store.load_snapshot(TENANT).await.unwrap();
        let maria = snapshot.client(s.client_id).unwrap();
        assert!(maria.purchased_packages[0].remaining_services.is_empty());
        assert_eq!(maria.version, 2);
        assert_eq!(snapshot.appointments.len(), 2);
    }
}
