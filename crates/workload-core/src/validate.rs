//! # Input Validation
//!
//! Range checks applied to a `ProgrammeInput` before any computation.
//!
//! - The whole input is rejected on the first failing field
//! - Nothing is coerced: a bad value is an error, never a silent zero
//! - Upper bounds keep exact decimal arithmetic far from overflow

use crate::primitives::{
    MAX_LEARNING_GROUPS, MAX_NAME_LENGTH, MAX_NOTE_LENGTH, MAX_QUANTITY, MAX_QUANTITY_SCALE,
    MAX_STUDENTS, MIN_LEARNING_GROUPS,
};
use crate::{ProgrammeInput, WorkloadError};
use rust_decimal::Decimal;

/// Stateless input validator.
pub struct Validator;

impl Validator {
    /// Validate every field of an input record.
    pub fn validate(input: &ProgrammeInput) -> Result<(), WorkloadError> {
        check_text("programme_name", &input.programme_name, MAX_NAME_LENGTH)?;

        if input.total_students < 1 {
            return Err(WorkloadError::invalid_input(
                "total_students",
                "must be at least 1",
            ));
        }
        if input.total_students > MAX_STUDENTS {
            return Err(WorkloadError::invalid_input(
                "total_students",
                format!("must not exceed {}", MAX_STUDENTS),
            ));
        }

        check_quantity(
            "validated_contact_hours_per_student",
            input.validated_contact_hours_per_student,
        )?;
        check_quantity("total_delivery_hours", input.total_delivery_hours)?;

        if let Some(sqm) = input.sqm_per_student {
            check_quantity("sqm_per_student", sqm)?;
        }

        if let Some(groups) = &input.learning_groups {
            if groups.len() < MIN_LEARNING_GROUPS || groups.len() > MAX_LEARNING_GROUPS {
                return Err(WorkloadError::invalid_input(
                    "learning_groups",
                    format!(
                        "expected {} to {} group types, got {}",
                        MIN_LEARNING_GROUPS,
                        MAX_LEARNING_GROUPS,
                        groups.len()
                    ),
                ));
            }
            for (idx, group) in groups.iter().enumerate() {
                let field = |name: &str| format!("learning_groups[{}].{}", idx, name);
                check_text(&field("name"), &group.name, MAX_NAME_LENGTH)?;
                // Checked before any division by group size.
                if group.size < 1 {
                    return Err(WorkloadError::invalid_input(
                        field("size"),
                        "must be at least 1",
                    ));
                }
                check_quantity(&field("hours"), group.hours)?;
            }
        }

        for (category, allocation) in &input.staffing {
            let field = |name: &str| format!("staffing.{}.{}", category.key(), name);
            check_quantity(&field("fte"), allocation.fte)?;
            if let Some(buyout) = allocation.buyout_hours {
                check_quantity(&field("buyout_hours"), buyout)?;
            }
            if let Some(remission) = allocation.remission_hours {
                check_quantity(&field("remission_hours"), remission)?;
            }
        }

        for (category, hours) in &input.other_teaching_hours {
            check_quantity(&format!("other_teaching_hours.{}", category.key()), *hours)?;
        }

        for (category, entry) in &input.unreplaced_hours {
            let field = |name: &str| format!("unreplaced_hours.{}.{}", category.key(), name);
            check_quantity(&field("hours"), entry.hours)?;
            if let Some(note) = &entry.note {
                check_text(&field("note"), note, MAX_NOTE_LENGTH)?;
            }
        }

        Ok(())
    }
}

fn check_quantity(field: &str, value: Decimal) -> Result<(), WorkloadError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(WorkloadError::invalid_input(field, "must not be negative"));
    }
    if value > Decimal::from(MAX_QUANTITY) {
        return Err(WorkloadError::invalid_input(
            field,
            format!("must not exceed {}", MAX_QUANTITY),
        ));
    }
    if value.normalize().scale() > MAX_QUANTITY_SCALE {
        return Err(WorkloadError::invalid_input(
            field,
            format!("at most {} decimal places", MAX_QUANTITY_SCALE),
        ));
    }
    Ok(())
}

fn check_text(field: &str, value: &str, max: usize) -> Result<(), WorkloadError> {
    if value.len() > max {
        return Err(WorkloadError::invalid_input(
            field,
            format!("length {} exceeds maximum {} bytes", value.len(), max),
        ));
    }
    Ok(())
}
