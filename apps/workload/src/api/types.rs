//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Request bodies
//! for calculation and submission are `ProgrammeInput` itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use workload_core::{DerivedMetrics, Insight, SubmissionRecord, SubmissionSummary};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CALCULATE RESPONSE
// =============================================================================

/// Result of a calculation, with narrative readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub metrics: Option<DerivedMetrics>,
    #[serde(default)]
    pub insights: Vec<Insight>,
    pub error: Option<String>,
}

impl CalculateResponse {
    pub fn success(metrics: DerivedMetrics, insights: Vec<Insight>) -> Self {
        Self {
            success: true,
            metrics: Some(metrics),
            insights,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            metrics: None,
            insights: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SUBMIT RESPONSE
// =============================================================================

/// Result of persisting a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: Option<u64>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub metrics: Option<DerivedMetrics>,
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn success(record: SubmissionRecord) -> Self {
        Self {
            success: true,
            id: Some(record.id),
            submitted_at: Some(record.submitted_at),
            metrics: Some(record.metrics),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            submitted_at: None,
            metrics: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// ADMIN RESPONSES
// =============================================================================

/// Stored submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionListResponse {
    pub success: bool,
    pub count: usize,
    pub submissions: Vec<SubmissionRecord>,
    pub error: Option<String>,
}

impl SubmissionListResponse {
    pub fn success(submissions: Vec<SubmissionRecord>) -> Self {
        Self {
            success: true,
            count: submissions.len(),
            submissions,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            submissions: vec![],
            error: Some(msg.into()),
        }
    }
}

/// One stored submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub submission: Option<SubmissionRecord>,
    pub error: Option<String>,
}

impl SubmissionResponse {
    pub fn success(submission: SubmissionRecord) -> Self {
        Self {
            success: true,
            submission: Some(submission),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            submission: None,
            error: Some(msg.into()),
        }
    }
}

/// Aggregate dashboard figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: Option<SubmissionSummary>,
    pub error: Option<String>,
}

impl SummaryResponse {
    pub fn success(summary: SubmissionSummary) -> Self {
        Self {
            success: true,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            summary: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EXPORT
// =============================================================================

/// Query string for `GET /admin/export`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    /// `csv` (default) or `json`.
    pub format: Option<String>,
}

/// Export response. `data` holds the CSV or JSON text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub format: Option<String>,
    pub rows: usize,
    pub data: Option<String>,
    /// BLAKE3 hex digest of `data`.
    pub checksum: Option<String>,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(format: &str, rows: usize, data: String, checksum: String) -> Self {
        Self {
            success: true,
            format: Some(format.to_string()),
            rows,
            data: Some(data),
            checksum: Some(checksum),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            format: None,
            rows: 0,
            data: None,
            checksum: None,
            error: Some(msg.into()),
        }
    }
}
