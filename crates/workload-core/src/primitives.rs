//! # Engine Primitives
//!
//! Fixed runtime constants for the workload engine.
//!
//! These are limits and format markers, not modelling constants. Every
//! modelling constant (multipliers, contingencies, nominal hours) lives in
//! [`crate::config::EngineConfig`] so deployments can override it.

/// Schema version stamped on every `DerivedMetrics` and flat export row.
///
/// Increment when a column is added, removed or renamed.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes for the binary submission-record format.
///
/// - Record Header = Magic Bytes ("WKLD") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"WKLD";

/// Current binary record format version.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// LEARNING GROUP LIMITS
// =============================================================================

/// Minimum number of learning-group types a programme may declare.
pub const MIN_LEARNING_GROUPS: usize = 1;

/// Maximum number of learning-group types a programme may declare.
pub const MAX_LEARNING_GROUPS: usize = 5;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of students in a single programme.
pub const MAX_STUDENTS: u32 = 1_000_000;

/// Upper bound for any hours, FTE or square-metre figure.
///
/// Keeps every product in the engine far inside `Decimal` range.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Maximum decimal places accepted on any input or configured quantity.
///
/// Bounds how small a positive divisor can be, so a non-zero denominator
/// always yields a value rather than overflowing to `n/a`.
pub const MAX_QUANTITY_SCALE: u32 = 6;

/// Upper bound for any configured multiplier.
pub const MAX_MULTIPLIER: i64 = 1_000;

/// Maximum length for programme and group names.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for free-text deduction notes.
pub const MAX_NOTE_LENGTH: usize = 1024;

/// Maximum size of an encoded submission record (1 MB).
pub const MAX_RECORD_SIZE: usize = 1024 * 1024;
