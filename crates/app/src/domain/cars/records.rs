//! Car Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::ids::TypedId;

/// Car Id
pub type CarId = TypedId<CarRecord>;

/// Car Record
#[derive(Debug, Clone, PartialEq)]
pub struct CarRecord {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    /// Denominated in the configured base currency.
    pub price: Decimal,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
