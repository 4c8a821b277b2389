//! Car Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::{
    cars::records::{CarId, CarRecord},
    options::OptionRecord,
    photos::PhotoRecord,
};

/// Number of cars per listing page.
pub const CARS_PER_PAGE: u32 = 9;

/// Car Model: a car with its photos and options.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub description: Option<String>,
    /// Primary first, then ascending id.
    pub photos: Vec<PhotoRecord>,
    /// Ordered by name.
    pub options: Vec<OptionRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Car {
    #[must_use]
    pub fn from_parts(
        record: CarRecord,
        photos: Vec<PhotoRecord>,
        options: Vec<OptionRecord>,
    ) -> Self {
        Self {
            id: record.id,
            brand: record.brand,
            model: record.model,
            year: record.year,
            price: record.price,
            description: record.description,
            photos,
            options,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    #[must_use]
    pub fn primary_photo(&self) -> Option<&PhotoRecord> {
        self.photos.iter().find(|photo| photo.is_primary)
    }

    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.name.as_str())
    }
}

/// One page of cars, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CarPage {
    pub cars: Vec<Car>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl CarPage {
    #[must_use]
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page)).max(1)
    }
}
