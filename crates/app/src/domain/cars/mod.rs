//! Cars
//!
//! The car aggregate: attributes, options and photos, written together.

pub mod data;
pub mod errors;
pub mod models;
pub mod presenter;
pub mod records;
mod repository;
pub mod service;

pub use errors::CarsServiceError;
pub use presenter::{CarPageView, CarPresenter, CarView, PhotoView};
pub use service::*;
