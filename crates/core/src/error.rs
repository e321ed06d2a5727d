//! Local validation errors.
//!
//! These are caught before any network call is made: the form (or CLI
//! invocation) stays editable and nothing reaches the server.

/// A validation failure detected client-side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required entry field was left blank.
    #[error("required field missing: {field}")]
    MissingField { field: &'static str },

    /// `result_type = REPLACE` was selected but no new serial number given.
    #[error("new serial number required for REPLACE")]
    NewSerialRequired,

    /// A reference number did not match the `PREFIX-N` shape.
    #[error("malformed reference number: {value}")]
    BadReference { value: String },
}
