//! # Flat Export Rows
//!
//! One row per submission: schema version, identity, raw input echo, then
//! every named derived figure in a fixed column order.
//!
//! Cell conventions:
//! - `n/a`: the figure was undefined for this input
//! - empty: the section did not apply (e.g. no staffing supplied)
//!
//! Column order is part of the schema; changing it requires bumping
//! `SCHEMA_VERSION`.

use crate::capacity::{BalanceStatus, CapacityAnalysis};
use crate::{Metric, StaffCategory, SubmissionRecord, WorkloadError};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Column names, in export order.
pub const COLUMNS: &[&str] = &[
    "schema_version",
    "id",
    "submitted_at",
    "programme_name",
    "total_students",
    "validated_contact_hours_per_student",
    "total_delivery_hours",
    "sqm_per_student",
    "learning_groups",
    "fte_AEF_RESEARCH",
    "fte_AEF_TEACHING",
    "fte_AL",
    "fte_HOP",
    "total_validated_hours",
    "delivery_multiplier",
    "repetition_factor",
    "base_staff_effort",
    "estimated_staff_effort",
    "staff_effort_per_validated_hour",
    "contact_vs_effort_ratio",
    "total_group_staff_effort",
    "capacity_model",
    "total_net_hours",
    "total_other_teaching_hours",
    "adjusted_net_hours",
    "total_unreplaced_hours",
    "final_available_hours",
    "total_gross_hours",
    "total_staff_available",
    "nominal_students_per_fte",
    "adjusted_students_per_fte",
    "total_space",
    "balance_status",
    "balance_magnitude",
];

fn dec(value: Decimal) -> String {
    value.normalize().to_string()
}

fn opt(value: Option<Decimal>) -> String {
    value.map(dec).unwrap_or_default()
}

fn metric(value: Option<Metric>) -> String {
    value.map(|m| m.to_string()).unwrap_or_default()
}

/// Render one record as cells aligned with [`COLUMNS`].
#[must_use]
pub fn flat_row(record: &SubmissionRecord) -> Vec<String> {
    let input = &record.input;
    let m = &record.metrics;

    let groups = input
        .groups()
        .iter()
        .map(|g| format!("{}:{}:{}", g.name, g.size, dec(g.hours)))
        .collect::<Vec<_>>()
        .join("|");
    let fte = |c: StaffCategory| opt(input.staffing.get(&c).map(|a| a.fte));

    let (detailed, simplified) = match &m.capacity {
        Some(CapacityAnalysis::Detailed(d)) => (Some(d), None),
        Some(CapacityAnalysis::Simplified(s)) => (None, Some(s)),
        None => (None, None),
    };
    let capacity_model = match &m.capacity {
        Some(CapacityAnalysis::Detailed(_)) => "detailed",
        Some(CapacityAnalysis::Simplified(_)) => "simplified",
        None => "",
    };
    let balance_status = match m.balance.map(|b| b.status) {
        Some(BalanceStatus::Surplus) => "surplus",
        Some(BalanceStatus::Shortfall) => "shortfall",
        None => "",
    };

    vec![
        record.schema_version.to_string(),
        record.id.to_string(),
        record.submitted_at.to_rfc3339(),
        input.programme_name.clone(),
        input.total_students.to_string(),
        dec(input.validated_contact_hours_per_student),
        dec(input.total_delivery_hours),
        opt(input.sqm_per_student),
        groups,
        fte(StaffCategory::AefResearch),
        fte(StaffCategory::AefTeaching),
        fte(StaffCategory::Al),
        fte(StaffCategory::Hop),
        dec(m.delivery.total_validated_hours),
        m.delivery.delivery_multiplier.to_string(),
        m.delivery.repetition_factor.to_string(),
        dec(m.delivery.base_staff_effort),
        dec(m.delivery.estimated_staff_effort),
        m.delivery.staff_effort_per_validated_hour.to_string(),
        m.delivery.contact_vs_effort_ratio.to_string(),
        opt(m.groups.as_ref().map(|g| g.total_staff_effort)),
        capacity_model.to_string(),
        opt(detailed.map(|d| d.total_net_hours)),
        opt(detailed.map(|d| d.total_other_teaching_hours)),
        opt(detailed.map(|d| d.adjusted_net_hours)),
        opt(detailed.map(|d| d.total_unreplaced_hours)),
        opt(detailed.map(|d| d.final_available_hours)),
        opt(simplified.map(|s| s.total_gross_hours)),
        opt(simplified.map(|s| s.total_staff_available)),
        metric(m.ratios.map(|r| r.nominal.students_per_fte)),
        metric(m.ratios.map(|r| r.adjusted.students_per_fte)),
        opt(m.total_space()),
        balance_status.to_string(),
        opt(m.balance.map(|b| b.magnitude)),
    ]
}

// =============================================================================
// EXPORT
// =============================================================================

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = WorkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(WorkloadError::SerializationError(format!(
                "Unknown format: {}. Use: csv, json",
                other
            ))),
        }
    }
}

impl ExportFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// MIME type for HTTP responses.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

/// RFC 4180 quoting: wrap in quotes when the cell holds a separator,
/// quote or line break; double embedded quotes.
fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn csv_line(cells: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let mut line = cells
        .into_iter()
        .map(|c| csv_cell(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Encode records as a flat table.
pub fn export_records(
    records: &[SubmissionRecord],
    format: ExportFormat,
) -> Result<Vec<u8>, WorkloadError> {
    match format {
        ExportFormat::Csv => {
            let mut out = csv_line(COLUMNS.iter());
            for record in records {
                out.push_str(&csv_line(flat_row(record)));
            }
            Ok(out.into_bytes())
        }
        ExportFormat::Json => {
            let rows: Vec<serde_json::Map<String, serde_json::Value>> = records
                .iter()
                .map(|record| {
                    COLUMNS
                        .iter()
                        .zip(flat_row(record))
                        .map(|(col, cell)| ((*col).to_string(), serde_json::Value::String(cell)))
                        .collect()
                })
                .collect();
            serde_json::to_vec_pretty(&rows)
                .map_err(|e| WorkloadError::SerializationError(e.to_string()))
        }
    }
}

/// BLAKE3 hex digest of exported bytes.
#[must_use]
pub fn export_checksum(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
