//! Photos
//!
//! Car photos, their stored originals and derivatives, and the single
//! primary photo every car with photos carries.

pub mod errors;
pub mod lifecycle;
pub mod maintenance;
pub mod primary;
pub mod records;
mod repository;

pub use errors::PhotosError;
pub use lifecycle::PhotoLifecycle;
pub use maintenance::{RegenerationReport, ThumbnailRegenerator};
pub use primary::{PrimaryCandidate, choose_primary};
pub use records::{PhotoId, PhotoRecord, PhotoUpload};
