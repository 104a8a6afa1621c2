//! # Calculation Engine
//!
//! Pure transformation `ProgrammeInput -> DerivedMetrics`.
//!
//! The engine holds only its configuration. It performs no I/O, keeps no
//! state between calls, and returns identical output for identical input,
//! so one instance can be shared freely across threads.
//!
//! ## Operation selection
//!
//! | Operation | Runs when |
//! |-----------|-----------|
//! | groups | `learning_groups` supplied |
//! | delivery | always |
//! | capacity | `staffing` non-empty (detailed or simplified model) |
//! | ratios | capacity computed |
//! | space | `sqm_per_student` supplied |
//! | balance | capacity computed |

use crate::capacity::{
    Balance, CapacityAnalysis, balance, detailed_capacity, simplified_capacity,
};
use crate::config::EngineConfig;
use crate::delivery::{DeliveryAnalysis, analyse_delivery};
use crate::groups::{GroupAnalysis, analyse_groups};
use crate::primitives::SCHEMA_VERSION;
use crate::ratios::{RatioAnalysis, analyse_ratios};
use crate::space::{SpaceAnalysis, analyse_space};
use crate::validate::Validator;
use crate::{Metric, ProgrammeInput, WorkloadError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// DERIVED METRICS
// =============================================================================

/// Every figure derived from one input. Absent sections did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupAnalysis>,
    pub delivery: DeliveryAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<CapacityAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratios: Option<RatioAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

impl DerivedMetrics {
    /// Required staff effort: the group total when groups were analysed,
    /// otherwise the aggregate estimate.
    #[must_use]
    pub fn demand(&self) -> Decimal {
        self.groups
            .as_ref()
            .map_or(self.delivery.estimated_staff_effort, |g| g.total_staff_effort)
    }

    /// Requested space, if space was analysed.
    #[must_use]
    pub fn total_space(&self) -> Option<Decimal> {
        self.space.map(|s| s.total_space)
    }

    /// The per-student repetition factor.
    #[must_use]
    pub fn repetition_factor(&self) -> Metric {
        self.delivery.repetition_factor
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Stateless calculator over a validated configuration.
#[derive(Debug, Clone)]
pub struct CalculationEngine {
    config: EngineConfig,
}

impl Default for CalculationEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }
}

impl CalculationEngine {
    /// Create an engine, rejecting out-of-range configuration.
    pub fn new(config: EngineConfig) -> Result<Self, WorkloadError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the input, then run every applicable operation.
    pub fn calculate(&self, input: &ProgrammeInput) -> Result<DerivedMetrics, WorkloadError> {
        Validator::validate(input)?;

        let groups = match &input.learning_groups {
            Some(groups) => Some(analyse_groups(
                input.total_students,
                groups,
                self.config.staff_effort_multiplier,
            )?),
            None => None,
        };

        let delivery = analyse_delivery(
            input.total_students,
            input.validated_contact_hours_per_student,
            input.total_delivery_hours,
            &self.config,
        );

        let capacity = self.capacity(input);
        let ratios = capacity
            .as_ref()
            .map(|c| analyse_ratios(input.total_students, c, self.config.nominal_fte_hours));
        let space = input
            .sqm_per_student
            .map(|sqm| analyse_space(input.total_students, sqm));

        let mut metrics = DerivedMetrics {
            schema_version: SCHEMA_VERSION,
            groups,
            delivery,
            capacity,
            ratios,
            space,
            balance: None,
        };
        metrics.balance = metrics
            .capacity
            .as_ref()
            .map(|c| balance(c.available_hours(), metrics.demand()));

        Ok(metrics)
    }

    /// Capacity under the model the input's populated fields select.
    #[must_use]
    pub fn capacity(&self, input: &ProgrammeInput) -> Option<CapacityAnalysis> {
        if input.staffing.is_empty() {
            return None;
        }
        if input.has_deduction_breakdown() {
            Some(CapacityAnalysis::Detailed(detailed_capacity(
                &input.staffing,
                &input.other_teaching_hours,
                &input.unreplaced_hours,
                &self.config,
            )))
        } else {
            Some(CapacityAnalysis::Simplified(simplified_capacity(
                &input.staffing,
                &self.config,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::BalanceStatus;
    use crate::{LearningGroup, StaffAllocation, StaffCategory};
    use rust_decimal_macros::dec;

    fn aggregate_config() -> EngineConfig {
        EngineConfig {
            effort_multiplier: dec!(2.788),
            contingency_buffer: dec!(0.10),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn aggregate_only_input() {
        let engine = CalculationEngine::new(aggregate_config()).expect("config");
        let input = ProgrammeInput::new(100, dec!(40), dec!(500));

        let metrics = engine.calculate(&input).expect("calculate");

        assert_eq!(metrics.schema_version, SCHEMA_VERSION);
        assert_eq!(metrics.delivery.repetition_factor, Metric::Value(dec!(12.5)));
        assert_eq!(metrics.delivery.base_staff_effort, dec!(1394.0));
        assert_eq!(metrics.delivery.estimated_staff_effort, dec!(1533.4));
        assert!(metrics.groups.is_none());
        assert!(metrics.capacity.is_none());
        assert!(metrics.balance.is_none());
        assert!(metrics.space.is_none());
    }

    #[test]
    fn demand_prefers_group_effort() {
        let engine = CalculationEngine::default();
        let input = ProgrammeInput::new(47, dec!(40), dec!(500))
            .with_groups(vec![LearningGroup::new("Tutor Group", 10, dec!(50))])
            .with_staff(StaffCategory::AefTeaching, StaffAllocation::fte(dec!(1)));

        let metrics = engine.calculate(&input).expect("calculate");

        assert_eq!(metrics.demand(), dec!(165.5));
        let balance = metrics.balance.expect("balance");
        assert_eq!(balance.demand, dec!(165.5));
        assert_eq!(balance.available, dec!(1228.5));
        assert_eq!(balance.status, BalanceStatus::Surplus);
    }

    #[test]
    fn detailed_model_selected_by_buyout() {
        let engine = CalculationEngine::default();
        let input = ProgrammeInput::new(40, dec!(10), dec!(100)).with_staff(
            StaffCategory::AefResearch,
            StaffAllocation::fte(dec!(1)).with_buyout(dec!(900)),
        );

        let metrics = engine.calculate(&input).expect("calculate");

        assert!(matches!(
            metrics.capacity,
            Some(CapacityAnalysis::Detailed(ref d)) if d.total_net_hours == Decimal::ZERO
        ));
        let ratios = metrics.ratios.expect("ratios");
        assert_eq!(ratios.nominal.students_per_fte, Metric::NotApplicable);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = EngineConfig {
            effort_multiplier: dec!(-1),
            ..EngineConfig::default()
        };
        assert!(CalculationEngine::new(config).is_err());
    }

    #[test]
    fn invalid_input_rejected() {
        let engine = CalculationEngine::default();
        let input = ProgrammeInput::new(10, dec!(1), dec!(1))
            .with_groups(vec![LearningGroup::new("Bad", 0, dec!(1))]);
        assert!(matches!(
            engine.calculate(&input),
            Err(WorkloadError::InvalidInput { .. })
        ));
    }
}
