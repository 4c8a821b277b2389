//! Cars Data

use rust_decimal::Decimal;

use crate::domain::{
    options::RawOption,
    photos::{PhotoId, PhotoUpload},
};

/// Car Attributes
#[derive(Debug, Clone, PartialEq)]
pub struct CarAttributes {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub description: Option<String>,
}

/// Car Attributes Patch
///
/// `None` leaves a column untouched. `description` is doubly optional so a
/// present `null` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarAttributesPatch {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<Option<String>>,
}

/// New Car Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub attributes: CarAttributes,
    pub options: Vec<RawOption>,
    pub photos: Vec<PhotoUpload>,
    /// Position in `photos` of the primary photo; clamped, defaults to the first.
    pub primary_photo_index: Option<usize>,
}

impl NewCar {
    #[must_use]
    pub fn new(attributes: CarAttributes) -> Self {
        Self {
            attributes,
            options: Vec::new(),
            photos: Vec::new(),
            primary_photo_index: None,
        }
    }
}

/// Car Update Data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarUpdate {
    pub attributes: CarAttributesPatch,
    /// `None` keeps the current options; an empty list detaches them all.
    pub options: Option<Vec<RawOption>>,
    pub new_photos: Vec<PhotoUpload>,
    pub removed_photo_ids: Vec<PhotoId>,
    pub primary_photo_id: Option<PhotoId>,
}
