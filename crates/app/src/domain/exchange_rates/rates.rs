//! Rate sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Currency;

/// Rates per supported currency, each expressed as UAH per one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRates(BTreeMap<Currency, f64>);

impl ExchangeRates {
    /// An empty set containing only the pivot at 1.0.
    #[must_use]
    pub fn with_pivot() -> Self {
        let mut rates = Self::default();
        rates.insert(Currency::PIVOT, 1.0);

        rates
    }

    #[must_use]
    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.0.get(&currency).copied()
    }

    pub fn insert(&mut self, currency: Currency, rate: f64) {
        self.0.insert(currency, rate);
    }

    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.0.contains_key(&currency)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.0.iter().map(|(currency, rate)| (*currency, *rate))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every supported currency mapped to its rate, `None` where absent.
    #[must_use]
    pub fn for_frontend(&self) -> BTreeMap<Currency, Option<f64>> {
        Currency::SUPPORTED
            .into_iter()
            .map(|currency| (currency, self.rate(currency)))
            .collect()
    }
}

impl FromIterator<(Currency, f64)> for ExchangeRates {
    fn from_iter<I: IntoIterator<Item = (Currency, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn with_pivot_contains_only_uah() {
        let rates = ExchangeRates::with_pivot();

        assert_eq!(rates.len(), 1);
        assert_eq!(rates.rate(Currency::Uah), Some(1.0));
    }

    #[test]
    fn for_frontend_lists_every_supported_currency() -> TestResult {
        let rates: ExchangeRates = [(Currency::Uah, 1.0), (Currency::Usd, 41.5)]
            .into_iter()
            .collect();

        let json = serde_json::to_value(rates.for_frontend())?;

        assert_eq!(
            json,
            serde_json::json!({ "UAH": 1.0, "USD": 41.5, "EUR": null })
        );

        Ok(())
    }
}
