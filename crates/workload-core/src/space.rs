//! # Space Analysis

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Requested teaching space for the whole programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceAnalysis {
    pub sqm_per_student: Decimal,
    pub total_space: Decimal,
}

/// `total_space = students * sqm_per_student`.
#[must_use]
pub fn analyse_space(total_students: u32, sqm_per_student: Decimal) -> SpaceAnalysis {
    SpaceAnalysis {
        sqm_per_student,
        total_space: Decimal::from(total_students) * sqm_per_student,
    }
}
