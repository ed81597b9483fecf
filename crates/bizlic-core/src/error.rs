//! # Error Types
//!
//! Errors raised by the data model. Decoding of service payloads never
//! produces these (it is lenient by construction); they come from the
//! presence checks applied to wizard input.

use thiserror::Error;

/// Error in model construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required wizard field was absent or blank.
    #[error("required field is missing: {0}")]
    MissingField(&'static str),
}
