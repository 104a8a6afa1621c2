//! # Core Type Definitions
//!
//! This module contains the value objects exchanged with the engine:
//! - Input record (`ProgrammeInput`, `LearningGroup`, `StaffAllocation`, ...)
//! - Category keys (`StaffCategory`, `OtherTeachingCategory`, `DeductionCategory`)
//! - Result cell (`Metric`)
//! - Error types (`WorkloadError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use exact decimal arithmetic (no floating-point)
//! - Use `BTreeMap` for category mappings so iteration order is fixed
//!
//! ## Data-entry contract
//!
//! Delivery hours, group hours and staffing hours never include one-on-one
//! sessions or lectures. The engine cannot verify this; every input collector
//! must state it to whoever fills in the figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// METRIC
// =============================================================================

/// A single derived figure.
///
/// `NotApplicable` marks a result whose denominator was zero (or not
/// positive where positivity is required). It is never conflated with a
/// computed zero. Serialises as a decimal or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum Metric {
    /// A computed value.
    Value(Decimal),
    /// The figure could not be computed for this input.
    NotApplicable,
}

impl Metric {
    /// `numerator / denominator`, or `NotApplicable` when the denominator is zero
    /// or the quotient leaves `Decimal` range.
    #[must_use]
    pub fn ratio(numerator: Decimal, denominator: Decimal) -> Self {
        numerator
            .checked_div(denominator)
            .map_or(Self::NotApplicable, Self::Value)
    }

    /// `numerator / denominator`, or `NotApplicable` unless the denominator is positive.
    #[must_use]
    pub fn ratio_positive(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator <= Decimal::ZERO {
            return Self::NotApplicable;
        }
        Self::ratio(numerator, denominator)
    }

    /// Divide an already-derived metric, propagating `NotApplicable`.
    #[must_use]
    pub fn divided_by(self, denominator: Decimal) -> Self {
        match self {
            Self::Value(v) => Self::ratio(v, denominator),
            Self::NotApplicable => Self::NotApplicable,
        }
    }

    /// The computed value, if any.
    #[must_use]
    pub fn value(self) -> Option<Decimal> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }

    /// True when a value was computed.
    #[must_use]
    pub fn is_applicable(self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Round to `dp` decimal places for presentation.
    #[must_use]
    pub fn rounded(self, dp: u32) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.round_dp(dp)),
            Self::NotApplicable => Self::NotApplicable,
        }
    }
}

impl From<Option<Decimal>> for Metric {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::NotApplicable, Self::Value)
    }
}

impl From<Metric> for Option<Decimal> {
    fn from(metric: Metric) -> Self {
        metric.value()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v.normalize()),
            Self::NotApplicable => f.write_str("n/a"),
        }
    }
}

// =============================================================================
// CATEGORY KEYS
// =============================================================================

/// Staff categories, each with its own nominal annual teaching allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffCategory {
    /// Academic/Education Fellow, research track.
    AefResearch,
    /// Academic/Education Fellow, teaching track.
    AefTeaching,
    /// Associate Lecturer.
    Al,
    /// Head of Programme.
    Hop,
}

impl StaffCategory {
    /// All categories in canonical order.
    pub const ALL: [StaffCategory; 4] = [
        StaffCategory::AefResearch,
        StaffCategory::AefTeaching,
        StaffCategory::Al,
        StaffCategory::Hop,
    ];

    /// Column-safe key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            StaffCategory::AefResearch => "AEF_RESEARCH",
            StaffCategory::AefTeaching => "AEF_TEACHING",
            StaffCategory::Al => "AL",
            StaffCategory::Hop => "HOP",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StaffCategory::AefResearch => "AEF (research)",
            StaffCategory::AefTeaching => "AEF (teaching)",
            StaffCategory::Al => "Associate Lecturer",
            StaffCategory::Hop => "Head of Programme",
        }
    }
}

impl std::fmt::Display for StaffCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// External teaching commitments that consume staff hours outside the programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtherTeachingCategory {
    CrossProgrammeElectives,
    Supervision,
    Other,
}

impl OtherTeachingCategory {
    pub const ALL: [OtherTeachingCategory; 3] = [
        OtherTeachingCategory::CrossProgrammeElectives,
        OtherTeachingCategory::Supervision,
        OtherTeachingCategory::Other,
    ];

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            OtherTeachingCategory::CrossProgrammeElectives => "CROSS_PROGRAMME_ELECTIVES",
            OtherTeachingCategory::Supervision => "SUPERVISION",
            OtherTeachingCategory::Other => "OTHER",
        }
    }
}

/// Reasons allocated hours are lost without replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionCategory {
    Illness,
    ExternalExecutive,
    Other,
}

impl DeductionCategory {
    pub const ALL: [DeductionCategory; 3] = [
        DeductionCategory::Illness,
        DeductionCategory::ExternalExecutive,
        DeductionCategory::Other,
    ];

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            DeductionCategory::Illness => "ILLNESS",
            DeductionCategory::ExternalExecutive => "EXTERNAL_EXECUTIVE",
            DeductionCategory::Other => "OTHER",
        }
    }
}

// =============================================================================
// INPUT RECORD
// =============================================================================

/// A programme-specific learning group type (e.g. "Tutor Group").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGroup {
    pub name: String,
    /// Typical number of students per group.
    pub size: u32,
    /// Total delivery hours conducted in this group type.
    pub hours: Decimal,
}

impl LearningGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, size: u32, hours: Decimal) -> Self {
        Self {
            name: name.into(),
            size,
            hours,
        }
    }
}

/// Staffing figures for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffAllocation {
    pub fte: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyout_hours: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remission_hours: Option<Decimal>,
}

impl StaffAllocation {
    /// Allocation with FTE only (no deduction breakdown).
    #[must_use]
    pub fn fte(fte: Decimal) -> Self {
        Self {
            fte,
            buyout_hours: None,
            remission_hours: None,
        }
    }

    #[must_use]
    pub fn with_buyout(mut self, hours: Decimal) -> Self {
        self.buyout_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn with_remission(mut self, hours: Decimal) -> Self {
        self.remission_hours = Some(hours);
        self
    }

    /// True when buyout or remission figures were collected.
    #[must_use]
    pub fn has_deductions(&self) -> bool {
        self.buyout_hours.is_some() || self.remission_hours.is_some()
    }
}

/// Hours lost without replacement, with an optional explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreplacedHours {
    pub hours: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl UnreplacedHours {
    #[must_use]
    pub fn new(hours: Decimal) -> Self {
        Self { hours, note: None }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One submission's worth of programme figures.
///
/// Constructed once per submission and passed by reference into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammeInput {
    #[serde(default)]
    pub programme_name: String,
    pub total_students: u32,
    pub validated_contact_hours_per_student: Decimal,
    /// Aggregate group-delivery hours (no 1:1s, no lectures).
    pub total_delivery_hours: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqm_per_student: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_groups: Option<Vec<LearningGroup>>,
    #[serde(default)]
    pub staffing: BTreeMap<StaffCategory, StaffAllocation>,
    #[serde(default)]
    pub other_teaching_hours: BTreeMap<OtherTeachingCategory, Decimal>,
    #[serde(default)]
    pub unreplaced_hours: BTreeMap<DeductionCategory, UnreplacedHours>,
}

impl ProgrammeInput {
    /// Create an input carrying only the aggregate figures.
    #[must_use]
    pub fn new(
        total_students: u32,
        validated_contact_hours_per_student: Decimal,
        total_delivery_hours: Decimal,
    ) -> Self {
        Self {
            programme_name: String::new(),
            total_students,
            validated_contact_hours_per_student,
            total_delivery_hours,
            sqm_per_student: None,
            learning_groups: None,
            staffing: BTreeMap::new(),
            other_teaching_hours: BTreeMap::new(),
            unreplaced_hours: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.programme_name = name.into();
        self
    }

    #[must_use]
    pub fn with_space(mut self, sqm_per_student: Decimal) -> Self {
        self.sqm_per_student = Some(sqm_per_student);
        self
    }

    #[must_use]
    pub fn with_groups(mut self, groups: Vec<LearningGroup>) -> Self {
        self.learning_groups = Some(groups);
        self
    }

    #[must_use]
    pub fn with_staff(mut self, category: StaffCategory, allocation: StaffAllocation) -> Self {
        self.staffing.insert(category, allocation);
        self
    }

    #[must_use]
    pub fn with_other_teaching(mut self, category: OtherTeachingCategory, hours: Decimal) -> Self {
        self.other_teaching_hours.insert(category, hours);
        self
    }

    #[must_use]
    pub fn with_unreplaced(mut self, category: DeductionCategory, entry: UnreplacedHours) -> Self {
        self.unreplaced_hours.insert(category, entry);
        self
    }

    /// Total students as a decimal.
    #[must_use]
    pub fn students(&self) -> Decimal {
        Decimal::from(self.total_students)
    }

    /// Learning groups, empty when none were supplied.
    #[must_use]
    pub fn groups(&self) -> &[LearningGroup] {
        self.learning_groups.as_deref().unwrap_or(&[])
    }

    /// True when any buyout, remission, other-teaching or unreplaced figure
    /// was collected. Selects the detailed capacity model.
    #[must_use]
    pub fn has_deduction_breakdown(&self) -> bool {
        self.staffing.values().any(StaffAllocation::has_deductions)
            || !self.other_teaching_hours.is_empty()
            || !self.unreplaced_hours.is_empty()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the workload system.
///
/// - Invalid input is rejected before any computation
/// - Undefined ratios are NOT errors: they surface as `Metric::NotApplicable`
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// A required field is missing or out of range.
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// The requested submission does not exist.
    #[error("Submission not found: {0}")]
    NotFound(u64),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl WorkloadError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
