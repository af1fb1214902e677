// src/db/booking_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{db_utils::begin_tenant_tx, error::AppError},
    db::TenantStore,
    models::{
        appointment::Appointment,
        catalog::{Product, Service, Staff},
        crm::Client,
        inventory::{StockAdjustment, StockMovement},
        tenant::{TenantSnapshot, TenantUpdates},
    },
};

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Escrita (sempre dentro da transação do commit)
    // ---

    async fn update_client(
        tx: &mut Transaction<'static, Postgres>,
        tenant_id: Uuid,
        client: &Client,
    ) -> Result<(), AppError> {
        // Só o que o núcleo altera: pacotes (e pontos). Checagem otimista de versão.
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET purchased_packages = $1, loyalty_points = $2, version = $3, updated_at = NOW()
            WHERE tenant_id = $4 AND id = $5 AND version = $6
            "#,
        )
            .bind(Json(&client.purchased_packages))
            .bind(client.loyalty_points)
            .bind(client.version)
            .bind(tenant_id)
            .bind(client.id)
            .bind(client.version - 1)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ConcurrentModification("client"));
        }
        Ok(())
    }

    async fn upsert_appointment(
        tx: &mut Transaction<'static, Postgres>,
        tenant_id: Uuid,
        appointment: &Appointment,
    ) -> Result<(), AppError> {
        let result = if appointment.version == 1 {
            sqlx::query(
                r#"
                INSERT INTO appointments
                    (id, tenant_id, client_id, staff_id, service_ids, start_time, end_time,
                     status, payment, rating, notes, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
                .bind(appointment.id)
                .bind(tenant_id)
                .bind(appointment.client_id)
                .bind(appointment.staff_id)
                .bind(&appointment.service_ids)
                .bind(appointment.start_time)
                .bind(appointment.end_time)
                .bind(appointment.status)
                .bind(Json(&appointment.payment))
                .bind(appointment.rating)
                .bind(appointment.notes.as_deref())
                .bind(appointment.version)
                .bind(appointment.created_at)
                .bind(appointment.updated_at)
                .execute(&mut **tx)
                .await?
        } else {
            sqlx::query(
                r#"
                UPDATE appointments
                SET client_id = $1, staff_id = $2, service_ids = $3, start_time = $4,
                    end_time = $5, status = $6, payment = $7, rating = $8, notes = $9,
                    version = $10, updated_at = $11
                WHERE tenant_id = $12 AND id = $13 AND version = $14
                "#,
            )
                .bind(appointment.client_id)
                .bind(appointment.staff_id)
                .bind(&appointment.service_ids)
                .bind(appointment.start_time)
                .bind(appointment.end_time)
                .bind(appointment.status)
                .bind(Json(&appointment.payment))
                .bind(appointment.rating)
                .bind(appointment.notes.as_deref())
                .bind(appointment.version)
                .bind(appointment.updated_at)
                .bind(tenant_id)
                .bind(appointment.id)
                .bind(appointment.version - 1)
                .execute(&mut **tx)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(AppError::ConcurrentModification("appointment"));
        }
        Ok(())
    }

    /// Ajuste relativo: o UPDATE trava a linha, então baixas concorrentes se somam.
    async fn adjust_stock(
        tx: &mut Transaction<'static, Postgres>,
        tenant_id: Uuid,
        adjustment: &StockAdjustment,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE products SET stock = stock + $1 WHERE tenant_id = $2 AND id = $3",
        )
            .bind(adjustment.change)
            .bind(tenant_id)
            .bind(adjustment.product_id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ConcurrentModification("product"));
        }
        Ok(())
    }

    /// Registra uma movimentação no livro-razão (auditoria).
    async fn record_stock_movement(
        tx: &mut Transaction<'static, Postgres>,
        tenant_id: Uuid,
        movement: &StockMovement,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO stock_movements
                (id, tenant_id, product_id, appointment_id, date, movement_type, quantity, reason, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
            .bind(movement.id)
            .bind(tenant_id)
            .bind(movement.product_id)
            .bind(movement.appointment_id)
            .bind(movement.date)
            .bind(movement.movement_type)
            .bind(movement.quantity)
            .bind(movement.reason)
            .bind(movement.notes.as_deref())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TenantStore for BookingRepository {
    async fn load_snapshot(&self, tenant_id: Uuid) -> Result<TenantSnapshot, AppError> {
        let mut tx = begin_tenant_tx(&self.pool, tenant_id).await?;

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, tenant_id, full_name, email, phone, loyalty_points, purchased_packages,
                   acquisition_source, is_active, version
            FROM clients WHERE tenant_id = $1 ORDER BY full_name ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        let staff = sqlx::query_as::<_, Staff>(
            "SELECT id, tenant_id, name, specializations, is_active, rating FROM staff WHERE tenant_id = $1 ORDER BY name ASC",
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, tenant_id, name, duration, price, cost, professional_use_products
            FROM services WHERE tenant_id = $1 ORDER BY name ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        let inventory = sqlx::query_as::<_, Product>(
            "SELECT id, tenant_id, name, stock FROM products WHERE tenant_id = $1 ORDER BY name ASC",
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, tenant_id, client_id, staff_id, service_ids, start_time, end_time,
                   status, payment, rating, notes, version, created_at, updated_at
            FROM appointments WHERE tenant_id = $1 ORDER BY start_time ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        let stock_movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, tenant_id, product_id, appointment_id, date, movement_type, quantity, reason, notes
            FROM stock_movements WHERE tenant_id = $1 ORDER BY date ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(TenantSnapshot {
            tenant_id,
            clients,
            staff,
            services,
            inventory,
            appointments,
            stock_movements,
        })
    }

    async fn commit(&self, tenant_id: Uuid, updates: &TenantUpdates) -> Result<(), AppError> {
        if updates.is_empty() {
            return Ok(());
        }

        // Uma transação só: qualquer erro abaixo descarta tudo (rollback no drop)
        let mut tx = begin_tenant_tx(&self.pool, tenant_id).await?;

        for client in &updates.clients {
            Self::update_client(&mut tx, tenant_id, client).await?;
        }
        for appointment in &updates.appointments {
            Self::upsert_appointment(&mut tx, tenant_id, appointment).await?;
        }
        for adjustment in &updates.stock_adjustments {
            Self::adjust_stock(&mut tx, tenant_id, adjustment).await?;
        }
        for movement in &updates.stock_movements {
            Self::record_stock_movement(&mut tx, tenant_id, movement).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
