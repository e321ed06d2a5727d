//! partflow-storage: the server-side arbiter of the warranty round-trip.
//!
//! The client-side model deliberately holds no locks; correctness of "at most
//! one resolution per pending record" lives entirely here. A backend must
//! treat each resolution as atomic (reject on an already-resolved reference)
//! and compute the reconciliation join over one consistent snapshot.
//!
//! The crate provides the [`PartflowStorage`] trait, the stored record types,
//! [`StorageError`], the [`MemoryStorage`] backend, and a backend-agnostic
//! [`conformance`] suite any implementation can run against itself.

pub mod conformance;
mod error;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use record::{JobCardRecord, MasterKind, MasterRecord, OutwardRecord, ResolutionRecord};
pub use traits::PartflowStorage;
