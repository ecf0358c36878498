//! Discovery and loading of XLSForm exports.
//!
//! A form is a directory holding `survey.csv` and `choices.csv`. Country forms
//! live side by side under one root and take their country code from the
//! first three characters of the directory name.

#![deny(unsafe_code)]

pub mod discovery;
pub mod error;
pub mod loader;
pub mod sheet;

pub use discovery::{
    CHOICES_FILE, DiscoveredForm, SURVEY_FILE, country_code_from_name, discover_country_forms,
};
pub use error::{IngestError, Result};
pub use loader::{CountryLoad, LoadFailure, load_country_forms, load_form};
pub use sheet::read_sheet;
