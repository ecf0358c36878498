//! Library components of the `kobo-mapper` binary.

pub mod config;
pub mod logging;
