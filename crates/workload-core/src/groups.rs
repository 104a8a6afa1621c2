//! # Group Repetition Analysis
//!
//! How many times each learning-group activity must be repeated to cover
//! the whole cohort, and the staff effort each group type implies.
//!
//! - `repetition_multiplier = students / size`
//! - `number_of_groups = ceil(repetition_multiplier)`
//! - `estimated_staff_effort = hours * staff_effort_multiplier`

use crate::{LearningGroup, WorkloadError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived figures for one learning-group type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub name: String,
    pub size: u32,
    pub hours: Decimal,
    pub repetition_multiplier: Decimal,
    pub number_of_groups: Decimal,
    pub estimated_staff_effort: Decimal,
}

/// Per-group results plus the aggregate effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAnalysis {
    pub groups: Vec<GroupMetrics>,
    pub total_staff_effort: Decimal,
}

/// Analyse every group type against the cohort size.
///
/// Rejects the whole input if any group size is zero; the check runs
/// before any division.
pub fn analyse_groups(
    total_students: u32,
    groups: &[LearningGroup],
    staff_effort_multiplier: Decimal,
) -> Result<GroupAnalysis, WorkloadError> {
    if let Some(idx) = groups.iter().position(|g| g.size == 0) {
        return Err(WorkloadError::invalid_input(
            format!("learning_groups[{}].size", idx),
            "must be at least 1",
        ));
    }

    let students = Decimal::from(total_students);
    let mut total_staff_effort = Decimal::ZERO;
    let mut out = Vec::with_capacity(groups.len());

    for group in groups {
        let repetition_multiplier = students / Decimal::from(group.size);
        let estimated_staff_effort = group.hours * staff_effort_multiplier;
        total_staff_effort += estimated_staff_effort;

        out.push(GroupMetrics {
            name: group.name.clone(),
            size: group.size,
            hours: group.hours,
            repetition_multiplier,
            number_of_groups: repetition_multiplier.ceil(),
            estimated_staff_effort,
        });
    }

    Ok(GroupAnalysis {
        groups: out,
        total_staff_effort,
    })
}
