//! Supported currencies.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::errors::ExchangeRatesError;

/// A currency the application prices and converts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    /// Ukrainian hryvnia, the pivot every rate is expressed against.
    Uah,
    Usd,
    Eur,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const SUPPORTED: [Self; 3] = [Self::Uah, Self::Usd, Self::Eur];

    /// The pivot currency; its rate is 1.0 by definition.
    pub const PIVOT: Self = Self::Uah;

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Uah => "UAH",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    #[must_use]
    pub const fn is_pivot(self) -> bool {
        matches!(self, Self::Uah)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ExchangeRatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();

        Self::SUPPORTED
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or(ExchangeRatesError::UnsupportedCurrency(code))
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;

        code.parse().map_err(de::Error::custom)
    }
}
