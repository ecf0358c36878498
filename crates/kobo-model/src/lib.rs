pub mod discrepancy;
pub mod error;
pub mod form;
pub mod ids;
pub mod options;
pub mod table;

pub use discrepancy::{DiscrepancyRecord, MatchStage, MatchStatus, Resolution, TaggedRecord};
pub use error::{ModelError, Result};
pub use form::{SurveyForm, Tab};
pub use ids::CountryCode;
pub use options::{
    ComparisonOptions, DEFAULT_THRESHOLD, LIST_NAME_COLUMN, NAME_COLUMN, TYPE_COLUMN,
};
pub use table::{CellValue, Dataset, Row};
