//! # Engine Configuration
//!
//! Every modelling constant the engine consumes, with the defaults observed
//! in deployed versions of the form.
//!
//! The deployed forms disagree with each other: the aggregate effort
//! multiplier was 3.31 in one and 2.788 in another, and the AEF teaching
//! allocation 1365 in one and 1362 in another. Which is authoritative cannot
//! be determined from the forms alone, so nothing here is hard-wired: load a
//! TOML file to override any value.
//!
//! ```toml
//! effort_multiplier = "3.31"
//! nominal_fte_hours = "800"
//!
//! [nominal_annual_hours]
//! AEF_TEACHING = "1362"
//! ```

use crate::primitives::{MAX_MULTIPLIER, MAX_QUANTITY, MAX_QUANTITY_SCALE};
use crate::{StaffCategory, WorkloadError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// OBSERVED DEFAULTS
// =============================================================================

/// Per-group staff effort multiplier (preparation, admin and delivery).
pub const DEFAULT_STAFF_EFFORT_MULTIPLIER: Decimal = Decimal::from_parts(331, 0, 0, false, 2);

/// Aggregate staff effort multiplier applied to total delivery hours.
pub const DEFAULT_EFFORT_MULTIPLIER: Decimal = Decimal::from_parts(2788, 0, 0, false, 3);

/// Contingency uplift on aggregate staff effort (10%).
pub const DEFAULT_CONTINGENCY_BUFFER: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Contingency deduction on simplified staff capacity (10%).
pub const DEFAULT_CAPACITY_CONTINGENCY: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Hours that make up one FTE for student/staff ratios.
pub const DEFAULT_NOMINAL_FTE_HOURS: Decimal = Decimal::from_parts(800, 0, 0, false, 0);

/// Default nominal annual teaching hours for a staff category.
#[must_use]
pub fn default_nominal_annual_hours(category: StaffCategory) -> Decimal {
    match category {
        StaffCategory::AefResearch => Decimal::from(752),
        StaffCategory::AefTeaching => Decimal::from(1365),
        StaffCategory::Al => Decimal::from(1053),
        StaffCategory::Hop => Decimal::from(300),
    }
}

// =============================================================================
// DELIVERY BASIS
// =============================================================================

/// Which delivery ratio a deployment treats as its headline figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryBasis {
    /// Delivery hours per validated programme hour (`deliveryMultiplier`).
    #[default]
    Programme,
    /// Delivery hours per validated hour of one student (`repetitionFactor`).
    PerStudent,
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Externally supplied constants for the calculation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub staff_effort_multiplier: Decimal,
    pub effort_multiplier: Decimal,
    pub contingency_buffer: Decimal,
    pub capacity_contingency: Decimal,
    pub nominal_fte_hours: Decimal,
    /// Overrides per category; missing categories use the observed default.
    pub nominal_annual_hours: BTreeMap<StaffCategory, Decimal>,
    pub delivery_basis: DeliveryBasis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staff_effort_multiplier: DEFAULT_STAFF_EFFORT_MULTIPLIER,
            effort_multiplier: DEFAULT_EFFORT_MULTIPLIER,
            contingency_buffer: DEFAULT_CONTINGENCY_BUFFER,
            capacity_contingency: DEFAULT_CAPACITY_CONTINGENCY,
            nominal_fte_hours: DEFAULT_NOMINAL_FTE_HOURS,
            nominal_annual_hours: StaffCategory::ALL
                .iter()
                .map(|c| (*c, default_nominal_annual_hours(*c)))
                .collect(),
            delivery_basis: DeliveryBasis::default(),
        }
    }
}

impl EngineConfig {
    /// Nominal annual hours for a category.
    #[must_use]
    pub fn annual_hours(&self, category: StaffCategory) -> Decimal {
        self.nominal_annual_hours
            .get(&category)
            .copied()
            .unwrap_or_else(|| default_nominal_annual_hours(category))
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        bounded(
            "staff_effort_multiplier",
            self.staff_effort_multiplier,
            MAX_MULTIPLIER,
        )?;
        bounded("effort_multiplier", self.effort_multiplier, MAX_MULTIPLIER)?;
        fraction("contingency_buffer", self.contingency_buffer)?;
        fraction("capacity_contingency", self.capacity_contingency)?;

        bounded("nominal_fte_hours", self.nominal_fte_hours, MAX_QUANTITY)?;
        if self.nominal_fte_hours.is_zero() {
            return Err(WorkloadError::invalid_config(
                "nominal_fte_hours",
                "must be greater than zero",
            ));
        }

        for (category, hours) in &self.nominal_annual_hours {
            bounded(
                &format!("nominal_annual_hours.{}", category.key()),
                *hours,
                MAX_QUANTITY,
            )?;
        }

        Ok(())
    }
}

/// `0 <= value <= max`, with at most `MAX_QUANTITY_SCALE` decimal places.
fn bounded(field: &str, value: Decimal, max: i64) -> Result<(), WorkloadError> {
    if value < Decimal::ZERO {
        return Err(WorkloadError::invalid_config(field, "must not be negative"));
    }
    if value > Decimal::from(max) {
        return Err(WorkloadError::invalid_config(
            field,
            format!("must not exceed {}", max),
        ));
    }
    if value.normalize().scale() > MAX_QUANTITY_SCALE {
        return Err(WorkloadError::invalid_config(
            field,
            format!("at most {} decimal places", MAX_QUANTITY_SCALE),
        ));
    }
    Ok(())
}

fn fraction(field: &str, value: Decimal) -> Result<(), WorkloadError> {
    if value.normalize().scale() > MAX_QUANTITY_SCALE {
        return Err(WorkloadError::invalid_config(
            field,
            format!("at most {} decimal places", MAX_QUANTITY_SCALE),
        ));
    }
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(WorkloadError::invalid_config(
            field,
            "must be at least 0 and below 1",
        ));
    }
    Ok(())
}
