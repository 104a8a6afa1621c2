//! # Insights
//!
//! Short narrative readings of a metrics record, for presenters that want
//! sentences rather than tables. Figures are rounded for reading only; the
//! metrics record keeps full precision.

use crate::capacity::BalanceStatus;
use crate::config::EngineConfig;
use crate::engine::DerivedMetrics;
use crate::{Metric, ProgrammeInput};
use serde::{Deserialize, Serialize};

/// What an insight talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    DeliveryMultiplier,
    GroupRepetition,
    StaffEffort,
    Space,
    Balance,
    StaffRatio,
}

/// One narrative line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Build the narrative lines for one calculation.
#[must_use]
pub fn insights(
    input: &ProgrammeInput,
    metrics: &DerivedMetrics,
    config: &EngineConfig,
) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Metric::Value(multiplier) = metrics.delivery.delivery_multiplier {
        out.push(Insight::new(
            InsightKind::DeliveryMultiplier,
            format!(
                "Each validated programme hour requires approximately {} hours of actual group delivery.",
                multiplier.round_dp(2)
            ),
        ));
    }

    if let Some(groups) = &metrics.groups {
        for g in &groups.groups {
            out.push(Insight::new(
                InsightKind::GroupRepetition,
                format!(
                    "The group type {} requires about {}x repetition ({} groups).",
                    g.name,
                    g.repetition_multiplier.round_dp(2),
                    g.number_of_groups
                ),
            ));
        }
        out.push(Insight::new(
            InsightKind::StaffEffort,
            format!(
                "Programme staff need to deliver a total of {} hours, based on a multiplier of {}x to account for preparation, admin, and delivery.",
                groups.total_staff_effort.round_dp(1),
                config.staff_effort_multiplier.normalize()
            ),
        ));
    } else {
        out.push(Insight::new(
            InsightKind::StaffEffort,
            format!(
                "Estimated staff effort is {} hours ({} delivery hours at {}x plus {}% contingency).",
                metrics.delivery.estimated_staff_effort.round_dp(1),
                input.total_delivery_hours.normalize(),
                config.effort_multiplier.normalize(),
                (config.contingency_buffer * rust_decimal::Decimal::ONE_HUNDRED).normalize()
            ),
        ));
    }

    if let Some(space) = metrics.space {
        out.push(Insight::new(
            InsightKind::Space,
            format!(
                "The teaching space request equates to {}m² per student, or a total of {}m².",
                space.sqm_per_student.round_dp(2),
                space.total_space.round_dp(1)
            ),
        ));
    }

    if let Some(balance) = metrics.balance {
        let message = match balance.status {
            BalanceStatus::Surplus => format!(
                "Available staff hours exceed required effort by {} hours.",
                balance.magnitude.round_dp(1)
            ),
            BalanceStatus::Shortfall => format!(
                "Staffing falls short of required effort by {} hours.",
                balance.magnitude.round_dp(1)
            ),
        };
        out.push(Insight::new(InsightKind::Balance, message));
    }

    if let Some(ratios) = metrics.ratios {
        let message = match ratios.adjusted.students_per_fte {
            Metric::Value(r) => format!(
                "After deductions there are {} students per FTE.",
                r.round_dp(1)
            ),
            Metric::NotApplicable => {
                "No staff hours remain after deductions, so no student/staff ratio can be given."
                    .to_string()
            }
        };
        out.push(Insight::new(InsightKind::StaffRatio, message));
    }

    out
}
