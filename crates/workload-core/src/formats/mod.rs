//! # Formats
//!
//! Byte-level encodings for submission records.
//!
//! - `persistence`: framed binary form stored in the submission store
//! - `row`: flat tabular rows (CSV / JSON) for export and dashboards
//!
//! File I/O lives in the app layer; everything here is a pure transformation.

pub mod persistence;
pub mod row;

pub use persistence::{RecordHeader, record_from_bytes, record_to_bytes};
pub use row::{COLUMNS, ExportFormat, export_checksum, export_records, flat_row};
