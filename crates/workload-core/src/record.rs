//! # Submission Records
//!
//! An input and its derived metrics, stamped for later aggregate reporting.
//! Records are produced once and never mutated.

use crate::engine::DerivedMetrics;
use crate::primitives::SCHEMA_VERSION;
use crate::ProgrammeInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: u64,
    pub schema_version: u32,
    pub submitted_at: DateTime<Utc>,
    pub input: ProgrammeInput,
    pub metrics: DerivedMetrics,
}

impl SubmissionRecord {
    /// Create a record at the current schema version.
    #[must_use]
    pub fn new(
        id: u64,
        submitted_at: DateTime<Utc>,
        input: ProgrammeInput,
        metrics: DerivedMetrics,
    ) -> Self {
        Self {
            id,
            schema_version: SCHEMA_VERSION,
            submitted_at,
            input,
            metrics,
        }
    }
}
