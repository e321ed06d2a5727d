use partflow_core::ValidationError;

/// All errors a `PartflowStorage` implementation can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No record with this reference number exists in the branch.
    #[error("reference not found: {reference_no}")]
    ReferenceNotFound { reference_no: String },

    /// The referenced record is already DONE. A pending record can have at
    /// most one resolution; the losing side of a concurrent resolve gets this.
    #[error("already resolved: {reference_no}")]
    AlreadyResolved { reference_no: String },

    /// The submitted payload failed server-side re-validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A backend-specific failure (connection, serialization, poisoned lock).
    #[error("storage backend error: {0}")]
    Backend(String),
}
