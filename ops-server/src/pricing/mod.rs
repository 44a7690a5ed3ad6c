//! Tier Pricing Policy
//!
//! Pure functions, no side effects. Unit price depends on whether the
//! order quantity crosses the bulk threshold. The same policy prices a
//! dispatch's expected revenue and the tiered split reported at settlement.
//!
//! Uses rust_decimal for monetary arithmetic, stores as f64.

use rust_decimal::prelude::*;

/// Bulk threshold: orders of this many bags or more get the lower tier price
pub const TIER_THRESHOLD_BAGS: i64 = 50;

/// Per-bag price at or above the bulk threshold
pub const LOWER_TIER_PRICE: f64 = 250.0;

/// Per-bag price below the bulk threshold
pub const UPPER_TIER_PRICE: f64 = 270.0;

/// A driver may not take a new dispatch while owing more than this
pub const OUTSTANDING_BALANCE_LIMIT: f64 = 30_000.0;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Unit price for an order of `bags`.
pub fn price_per_bag(bags: i64) -> f64 {
    if bags >= TIER_THRESHOLD_BAGS {
        LOWER_TIER_PRICE
    } else {
        UPPER_TIER_PRICE
    }
}

/// Expected revenue for a single customer order of `bags`.
pub fn order_revenue(bags: i64) -> f64 {
    to_f64(Decimal::from(bags) * to_decimal(price_per_bag(bags)))
}

/// Revenue for an actual tiered sales split reported at settlement.
pub fn tiered_revenue(bags_at_lower_tier: i64, bags_at_upper_tier: i64) -> f64 {
    let lower = Decimal::from(bags_at_lower_tier) * to_decimal(LOWER_TIER_PRICE);
    let upper = Decimal::from(bags_at_upper_tier) * to_decimal(UPPER_TIER_PRICE);
    to_f64(lower + upper)
}

/// `expected - paid`, rounded to 2 dp. May be negative on over-payment.
pub fn balance_due(expected: f64, paid: f64) -> f64 {
    to_f64(to_decimal(expected) - to_decimal(paid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_selects_tier() {
        assert_eq!(price_per_bag(49), UPPER_TIER_PRICE);
        assert_eq!(price_per_bag(50), LOWER_TIER_PRICE);
        assert_eq!(price_per_bag(51), LOWER_TIER_PRICE);
        assert_eq!(price_per_bag(0), UPPER_TIER_PRICE);
    }

    #[test]
    fn order_revenue_uses_order_size_tier() {
        assert_eq!(order_revenue(60), 15_000.0);
        assert_eq!(order_revenue(10), 2_700.0);
    }

    #[test]
    fn tiered_revenue_sums_both_tiers() {
        assert_eq!(tiered_revenue(60, 0), 15_000.0);
        assert_eq!(tiered_revenue(40, 20), 15_400.0);
        assert_eq!(tiered_revenue(0, 0), 0.0);
    }

    #[test]
    fn balance_due_rounds_to_cents() {
        assert_eq!(balance_due(15_000.0, 14_999.75), 0.25);
        assert_eq!(balance_due(15_000.0, 15_000.0), 0.0);
        assert_eq!(balance_due(15_000.0, 16_000.0), -1_000.0);
    }
}
