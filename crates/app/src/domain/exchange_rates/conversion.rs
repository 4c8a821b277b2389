//! Fail-open price conversion.

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use serde::Serialize;

use super::{Currency, ExchangeRates};

const PRICE_SCALE: u32 = 2;

/// How a converted amount was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Target equals the base currency; no rate was consulted.
    Identity,
    Converted,
    /// A needed rate was missing or unusable and the base amount was returned.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub amount: Decimal,
    pub outcome: ConversionOutcome,
}

impl Conversion {
    fn new(amount: Decimal, outcome: ConversionOutcome) -> Self {
        Self {
            amount: round_price(amount),
            outcome,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.outcome == ConversionOutcome::Degraded
    }
}

/// Half away from zero, two decimal places.
#[must_use]
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert `amount` denominated in `base` into `target` through the UAH pivot.
///
/// Never fails: when a rate needed for the path is missing or not positive, or
/// the arithmetic overflows, the base amount is returned rounded and marked
/// [`ConversionOutcome::Degraded`].
#[must_use]
pub fn convert_amount(
    amount: Decimal,
    base: Currency,
    target: Currency,
    rates: &ExchangeRates,
) -> Conversion {
    if target == base {
        return Conversion::new(amount, ConversionOutcome::Identity);
    }

    let Some(base_rate) = usable_rate(rates, base) else {
        return Conversion::new(amount, ConversionOutcome::Degraded);
    };

    let Some(in_uah) = amount.checked_mul(base_rate) else {
        return Conversion::new(amount, ConversionOutcome::Degraded);
    };

    if target.is_pivot() {
        return Conversion::new(in_uah, ConversionOutcome::Converted);
    }

    match usable_rate(rates, target).and_then(|rate| in_uah.checked_div(rate)) {
        Some(converted) => Conversion::new(converted, ConversionOutcome::Converted),
        None => Conversion::new(amount, ConversionOutcome::Degraded),
    }
}

fn usable_rate(rates: &ExchangeRates, currency: Currency) -> Option<Decimal> {
    rates
        .rate(currency)
        .and_then(Decimal::from_f64)
        .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
}
