//! Car Options
//!
//! A shared vocabulary of feature tags ("Bluetooth", "Heated seats") that
//! cars reference by name.

pub mod normalize;
pub mod records;
pub(crate) mod repository;

pub use normalize::{RawOption, normalize_options};
pub use records::{OptionId, OptionRecord};
