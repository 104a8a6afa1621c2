//! # workload-core
//!
//! The deterministic Workload & Resource Calculation Engine.
//!
//! Given an academic programme's student numbers, validated contact hours,
//! delivery hours, learning-group structure and staffing allocations, the
//! engine derives how much staff effort delivery requires, how much staff
//! time is actually available, and whether the difference is a surplus or a
//! shortfall.
//!
//! ## Architectural Constraints
//!
//! - Exact decimal arithmetic; undefined figures are `Metric::NotApplicable`,
//!   never a silent zero
//! - The engine is stateless: every operation is a pure function of
//!   `(ProgrammeInput, EngineConfig)`
//! - Persistence (`storage`) and reporting (`dashboard`, `formats`) consume
//!   engine output; the engine never depends on them
//! - NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod capacity;
pub mod config;
pub mod dashboard;
pub mod delivery;
pub mod engine;
pub mod formats;
pub mod groups;
pub mod insights;
pub mod primitives;
pub mod ratios;
pub mod record;
pub mod space;
pub mod storage;
pub mod types;
pub mod validate;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DeductionCategory, LearningGroup, Metric, OtherTeachingCategory, ProgrammeInput,
    StaffAllocation, StaffCategory, UnreplacedHours, WorkloadError,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use capacity::{Balance, BalanceStatus, CapacityAnalysis};
pub use config::{DeliveryBasis, EngineConfig};
pub use engine::{CalculationEngine, DerivedMetrics};
pub use insights::{Insight, InsightKind, insights};
pub use validate::Validator;

// =============================================================================
// RE-EXPORTS: Records, Storage, Reporting
// =============================================================================

pub use dashboard::SubmissionSummary;
pub use formats::{ExportFormat, export_checksum, export_records, record_from_bytes, record_to_bytes};
pub use record::SubmissionRecord;
pub use storage::SubmissionStore;
