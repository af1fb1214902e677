// src/services/consumption.rs
//
// Baixa de estoque por uso profissional. A regra de "dispara uma vez só" vive
// inteira na tabela de transições abaixo.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        appointment::AppointmentStatus as S,
        catalog::{Product, Service},
        inventory::{MovementType, StockAdjustment, StockMovement, StockMovementReason},
        notice::Notice,
    },
};

// --- Tabela de Transições ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    ConsumeProfessionalProducts,
}

const CONSUME: &[TransitionEffect] = &[TransitionEffect::ConsumeProfessionalProducts];

/// (status anterior, novo status) -> efeitos. `None` = agendamento novo.
/// Qualquer par ausente não tem efeito (ex.: Completed -> Paid).
const TRANSITIONS: &[(Option<S>, S, &[TransitionEffect])] = &[
    (None, S::Completed, CONSUME),
    (None, S::Paid, CONSUME),
    (Some(S::Scheduled), S::Completed, CONSUME),
    (Some(S::Scheduled), S::Paid, CONSUME),
    (Some(S::Cancelled), S::Completed, CONSUME),
    (Some(S::Cancelled), S::Paid, CONSUME),
    (Some(S::NoShow), S::Completed, CONSUME),
    (Some(S::NoShow), S::Paid, CONSUME),
];

pub fn effects_for(from: Option<S>, to: S) -> &'static [TransitionEffect] {
    TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, effects)| *effects)
        .unwrap_or(&[])
}

// --- Política de Estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    /// Permite saldo negativo e apenas avisa (conciliação posterior).
    #[default]
    AllowOverdraft,
    /// Recusa o salvamento se algum produto ficaria negativo.
    Reject,
}

impl FromStr for StockPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_overdraft" | "allow" => Ok(StockPolicy::AllowOverdraft),
            "reject" => Ok(StockPolicy::Reject),
            other => Err(anyhow::anyhow!("STOCK_POLICY inválida: {other}")),
        }
    }
}

// --- Motor ---

#[derive(Debug, Clone, Default)]
pub struct InventoryDelta {
    pub adjustments: Vec<StockAdjustment>,
    pub movements: Vec<StockMovement>,
}

impl InventoryDelta {
    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty() && self.movements.is_empty()
    }
}

pub struct ConsumptionContext<'a> {
    pub tenant_id: Uuid,
    pub appointment_id: Uuid,
    pub date: DateTime<Utc>,
    pub inventory: &'a [Product],
}

pub fn apply_if_qualifying(
    previous: Option<S>,
    new_status: S,
    services: &[&Service],
    ctx: &ConsumptionContext<'_>,
) -> InventoryDelta {
    let mut delta = InventoryDelta::default();
    let effects = effects_for(previous, new_status);

    if effects.is_empty() && new_status.is_qualifying() {
        tracing::debug!("Status {:?} já qualificado; estoque não é baixado de novo", new_status);
    }

    for effect in effects {
        match effect {
            TransitionEffect::ConsumeProfessionalProducts => consume(services, ctx, &mut delta),
        }
    }

    delta
}

fn consume(services: &[&Service], ctx: &ConsumptionContext<'_>, delta: &mut InventoryDelta) {
    for service in services {
        for usage in &service.professional_use_products {
            if usage.quantity_used <= 0 {
                continue;
            }

            let Some(product) = ctx.inventory.iter().find(|p| p.id == usage.product_id) else {
                tracing::warn!(
                    "Produto {} do serviço '{}' não existe no estoque; baixa ignorada",
                    usage.product_id,
                    service.name
                );
                continue;
            };

            // Um ajuste por produto; um movimento por par (serviço, produto)
            match delta.adjustments.iter_mut().find(|a| a.product_id == product.id) {
                Some(adjustment) => {
                    adjustment.change -= usage.quantity_used;
                    adjustment.resulting_stock -= usage.quantity_used;
                }
                None => delta.adjustments.push(StockAdjustment {
                    product_id: product.id,
                    change: -usage.quantity_used,
                    resulting_stock: product.stock - usage.quantity_used,
                }),
            }

            delta.movements.push(StockMovement {
                id: Uuid::new_v4(),
                tenant_id: ctx.tenant_id,
                product_id: product.id,
                appointment_id: Some(ctx.appointment_id),
                date: ctx.date,
                movement_type: MovementType::Out,
                quantity: usage.quantity_used,
                reason: StockMovementReason::ProfessionalUse,
                notes: Some(format!("Serviço: {}", service.name)),
            });
        }
    }
}

/// Aplica a política de estoque aos ajustes. Saldo negativo vira aviso ou erro.
pub fn check_stock(
    delta: &InventoryDelta,
    inventory: &[Product],
    policy: StockPolicy,
) -> Result<Vec<Notice>, AppError> {
    if delta.is_empty() {
        return Ok(Vec::new());
    }

    let mut notices = Vec::new();

    for adjustment in delta.adjustments.iter().filter(|a| a.resulting_stock < 0) {
        let Some(product) = inventory.iter().find(|p| p.id == adjustment.product_id) else {
            continue;
        };

        match policy {
            StockPolicy::Reject => {
                return Err(AppError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock,
                    requested: -adjustment.change,
                });
            }
            StockPolicy::AllowOverdraft => {
                tracing::warn!(
                    "Estoque negativo: produto '{}' ficará com {}",
                    product.name,
                    adjustment.resulting_stock
                );
                notices.push(Notice::NegativeStock {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    stock: adjustment.resulting_stock,
                });
            }
        }
    }

    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures::{product, service_using, TENANT};

    const ALL: [S; 5] = [S::Scheduled, S::Completed, S::Paid, S::Cancelled, S::NoShow];

    fn ctx(inventory: &[Product]) -> ConsumptionContext<'_> {
        ConsumptionContext {
            tenant_id: TENANT,
            appointment_id: Uuid::new_v4(),
            date: Utc::now(),
            inventory,
        }
    }

    #[test]
    fn table_fires_only_on_entering_a_qualifying_status() {
        let froms = std::iter::once(None).chain(ALL.iter().copied().map(Some));
        for from in froms {
            for to in ALL {
                let entering = to.is_qualifying() && !from.is_some_and(S::is_qualifying);
                assert_eq!(
                    !effects_for(from, to).is_empty(),
                    entering,
                    "transição {from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn scheduled_to_completed_deducts_once() {
        let dye = product("Tinta", 10);
        let color = service_using("Color", 45, 120, &[(dye.id, 3)]);
        let inventory = vec![dye.clone()];

        let delta = apply_if_qualifying(Some(S::Scheduled), S::Completed, &[&color], &ctx(&inventory));

        assert_eq!(
            delta.adjustments,
            vec![StockAdjustment { product_id: dye.id, change: -3, resulting_stock: 7 }]
        );
        assert_eq!(delta.movements.len(), 1);
        let movement = &delta.movements[0];
        assert_eq!(movement.quantity, 3);
        assert_eq!(movement.movement_type, MovementType::Out);
        assert_eq!(movement.reason, StockMovementReason::ProfessionalUse);
        assert_eq!(movement.notes.as_deref(), Some("Serviço: Color"));
    }

    #[test]
    fn completed_to_paid_does_not_deduct_again() {
        let dye = product("Tinta", 7);
        let color = service_using("Color", 45, 120, &[(dye.id, 3)]);
        let inventory = vec![dye];

        let delta = apply_if_qualifying(Some(S::Completed), S::Paid, &[&color], &ctx(&inventory));

        assert!(delta.is_empty());
    }

    #[test]
    fn one_movement_per_service_product_pair() {
        let dye = product("Tinta", 10);
        let gloves = product("Luvas", 50);
        let color = service_using("Color", 45, 120, &[(dye.id, 3), (gloves.id, 2)]);
        let tone = service_using("Tonalizante", 20, 60, &[(dye.id, 1)]);
        let cut = service_using("Haircut", 30, 50, &[]);
        let inventory = vec![dye.clone(), gloves.clone()];

        let delta = apply_if_qualifying(None, S::Paid, &[&color, &tone, &cut], &ctx(&inventory));

        assert_eq!(delta.movements.len(), 3);
        assert_eq!(
            delta.adjustments,
            vec![
                StockAdjustment { product_id: dye.id, change: -4, resulting_stock: 6 },
                StockAdjustment { product_id: gloves.id, change: -2, resulting_stock: 48 },
            ]
        );
    }

    #[test]
    fn services_without_products_emit_nothing() {
        let cut = service_using("Haircut", 30, 50, &[]);

        let delta = apply_if_qualifying(Some(S::Scheduled), S::Completed, &[&cut], &ctx(&[]));

        assert!(delta.is_empty());
    }

    #[test]
    fn overdraft_warns_and_reject_fails() {
        let dye = product("Tinta", 1);
        let color = service_using("Color", 45, 120, &[(dye.id, 3)]);
        let inventory = vec![dye.clone()];
        let delta = apply_if_qualifying(None, S::Completed, &[&color], &ctx(&inventory));

        let notices = check_stock(&delta, &inventory, StockPolicy::AllowOverdraft).unwrap();
        assert_eq!(
            notices,
            vec![Notice::NegativeStock { product_id: dye.id, product_name: "Tinta".into(), stock: -2 }]
        );

        let err = check_stock(&delta, &inventory, StockPolicy::Reject).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 1, requested: 3, .. }));
    }

    #[test]
    fn parses_policy_from_env_value() {
        assert_eq!("reject".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert_eq!("ALLOW_OVERDRAFT".parse::<StockPolicy>().unwrap(), StockPolicy::AllowOverdraft);
        assert!("nope".parse::<StockPolicy>().is_err());
    }
}
