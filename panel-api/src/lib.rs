//! # Panel
//!
//! Shared data model for the index panel analytics engine: constituent rows,
//! quarter labels, entity keys, grouping fields and the plain records every
//! query returns.

pub mod model;
pub mod traits;

pub use model::category::{CategoryField, Weighting, MISSING_CATEGORY};
pub use model::composition::{
    CategoryCap, CategoryCount, CategoryShare, CategorySharePoint, Concentration, QuarterValue,
    SnapshotSummary,
};
pub use model::constituent::{ConstituentRow, Identifiers};
pub use model::entity::{EntityKey, EntityMatch, EntityPoint, EntityProfile};
pub use model::quarter::QuarterLabel;
pub use model::turnover::{LeaverTenure, TurnoverRecord};
pub use model::ParseError;
pub use traits::key_extractor::KeyExtractor;

pub mod prelude {
    pub use crate::model::category::{CategoryField, Weighting};
    pub use crate::model::constituent::ConstituentRow;
    pub use crate::model::entity::EntityKey;
    pub use crate::model::quarter::QuarterLabel;
    pub use crate::traits::key_extractor::KeyExtractor;
}
