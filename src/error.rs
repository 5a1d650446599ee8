//! Error types for loading, linking and exporting NEO data

use thiserror::Error;

/// Result type alias for model and linker operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required field was absent or empty
    #[error("{entity} record is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A field was present but could not be coerced to its type
    #[error("{entity} field '{field}' has invalid value '{value}': {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Two NEOs share a primary designation
    #[error("duplicate NEO designation '{designation}' (rows {first_row} and {second_row})")]
    DuplicateDesignation {
        designation: String,
        first_row: usize,
        second_row: usize,
    },

    /// A close approach refers to a designation absent from the NEO collection
    #[error("close approach at row {approach_row} refers to unknown designation '{designation}'")]
    UnknownDesignation {
        designation: String,
        approach_row: usize,
    },

    /// A close approach was used before the linker resolved its NEO
    #[error("close approach for '{0}' has not been linked to a NEO")]
    Unlinked(String),

    /// Output path has an extension with no writer
    #[error("unsupported output format: {0}")]
    UnsupportedOutput(String),
}

impl Error {
    /// Create an invalid-field error
    pub fn invalid_field(
        entity: &'static str,
        field: &'static str,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidField {
            entity,
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
