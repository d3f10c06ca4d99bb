//! Climate Observation Model
//!
//! Shared data model for the disease risk pipeline: the four environmental
//! readings, regional risk context, the closed disease set, and the score
//! vectors passed between the scoring stages.

mod disease;
mod error;
mod feature;
mod numeric;
mod observation;
mod scores;

pub use disease::Disease;
pub use error::ValidationError;
pub use feature::{Feature, FeatureWeights, FEATURE_DIMENSION};
pub use numeric::{format_decimal, round_to};
pub use observation::{Observation, RawReading, RiskContext};
pub use scores::ScoreVector;
