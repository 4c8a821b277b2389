//! Carlot Domain Concerns

pub mod cars;
pub mod exchange_rates;
pub mod options;
pub mod photos;
