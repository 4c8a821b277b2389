//! Option Records

use serde::Serialize;

use crate::ids::TypedId;

/// Option Id
pub type OptionId = TypedId<OptionRecord>;

/// Option Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRecord {
    pub id: OptionId,
    pub name: String,
}
