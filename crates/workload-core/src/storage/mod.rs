//! # Storage
//!
//! Persistence collaborator for submission records. The calculation engine
//! never reads or writes here.

mod redb_store;

pub use redb_store::SubmissionStore;
