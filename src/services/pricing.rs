// src/services/pricing.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::catalog::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTotals {
    /// Minutos.
    #[schema(example = 75)]
    pub total_duration: i64,
    #[schema(example = "170.00")]
    pub total_price: Decimal,
}

pub fn aggregate(selected: &[&Service]) -> ServiceTotals {
    selected.iter().fold(
        ServiceTotals { total_duration: 0, total_price: Decimal::ZERO },
        |acc, s| ServiceTotals {
            total_duration: acc.total_duration + i64::from(s.duration),
            total_price: acc.total_price + s.price,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures::service;

    #[test]
    fn sums_duration_and_price() {
        let cut = service("Haircut", 30, 50);
        let color = service("Color", 45, 120);

        let totals = aggregate(&[&cut, &color]);

        assert_eq!(totals.total_duration, 75);
        assert_eq!(totals.total_price, Decimal::from(170));
    }

    #[test]
    fn empty_selection_is_zero() {
        let totals = aggregate(&[]);
        assert_eq!(totals, ServiceTotals { total_duration: 0, total_price: Decimal::ZERO });
    }
}
