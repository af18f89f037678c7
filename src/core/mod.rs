pub mod category;
pub mod confidence;
pub mod etl;
pub mod matcher;
pub mod progress;
pub mod report;
pub mod scorer;
pub mod similarity;
pub mod snippet;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{Confidence, MatchOutcome, PoiRecord};
pub use crate::domain::ports::{ConfigProvider, PlacesApi, Storage};
pub use crate::utils::error::Result;
