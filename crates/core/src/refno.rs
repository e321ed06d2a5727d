//! Per-branch human-readable reference numbers (`OUT-5`, `JOB-100`).
//!
//! Numbers are issued by the storage backend, unique within a branch and
//! monotonically increasing per category. The client formats and parses them
//! but never invents one.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The per-branch sequence a reference number is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Supplier outward records (`OUT-n`).
    Outward,
    /// Customer job cards (`JOB-n`).
    JobCard,
}

impl SequenceKind {
    pub fn prefix(self) -> &'static str {
        match self {
            SequenceKind::Outward => "OUT",
            SequenceKind::JobCard => "JOB",
        }
    }
}

/// A formatted reference number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceNo(String);

impl ReferenceNo {
    pub fn new(kind: SequenceKind, seq: u64) -> Self {
        ReferenceNo(format!("{}-{}", kind.prefix(), seq))
    }

    /// Accept a user-supplied reference, normalizing case and whitespace.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let v = value.trim().to_uppercase();
        let bad = || ValidationError::BadReference {
            value: value.to_string(),
        };
        let (prefix, seq) = v.split_once('-').ok_or_else(bad)?;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(bad());
        }
        if seq.is_empty() || !seq.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }
        Ok(ReferenceNo(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
