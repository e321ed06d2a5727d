//! Branch scoping and session identity.
//!
//! The original app scattered `localStorage` lookups (token, role, active
//! branch, permission list) through every screen. Here the session is one
//! explicit value constructed at startup and passed into whatever needs it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of the branch an operation is scoped to.
///
/// Carried as the `branch-id` header on every request; a missing header means
/// branch `"1"`. Reference number sequences, pending lists, and reports are
/// all per-branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchId(String);

impl BranchId {
    pub const DEFAULT: &'static str = "1";

    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.trim().is_empty() {
            Self::default()
        } else {
            BranchId(id.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BranchId {
    fn default() -> Self {
        BranchId(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is operating, against which branch, with what token.
///
/// The permission set is a UI affordance only: it decides what to show or
/// enable, never what the server will accept. The server re-validates every
/// mutating request against the bearer token; a client with an edited
/// permission list gains nothing.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Bearer token sent on mutating requests. `None` for open servers.
    pub token: Option<String>,
    /// Display role (`"ADMIN"`, `"STAFF"`, ...).
    pub role: String,
    /// Named screen permissions. Empty set means "show everything".
    pub permissions: BTreeSet<String>,
    /// Branch every operation in this session is scoped to.
    pub active_branch: BranchId,
}

impl SessionContext {
    pub fn new(token: Option<String>, active_branch: BranchId) -> Self {
        SessionContext {
            token,
            role: "STAFF".to_string(),
            permissions: BTreeSet::new(),
            active_branch,
        }
    }

    /// Whether the UI should offer the named screen. Affordance, not security.
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.is_empty() || self.permissions.contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_branch_falls_back_to_default() {
        assert_eq!(BranchId::new("  ").as_str(), "1");
        assert_eq!(BranchId::new("2").as_str(), "2");
    }

    #[test]
    fn empty_permission_set_allows_everything() {
        let ctx = SessionContext::new(None, BranchId::default());
        assert!(ctx.can("jobcard"));

        let mut scoped = ctx.clone();
        scoped.permissions.insert("sales".to_string());
        assert!(scoped.can("sales"));
        assert!(!scoped.can("jobcard"));
    }
}
