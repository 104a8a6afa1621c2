//! # Student/Staff Ratios
//!
//! `ratio(hours) = students / (hours / nominal_fte_hours)`
//!
//! Undefined whenever the hours base is not positive: a programme with no
//! available staff time has no meaningful ratio, not an infinite one.

use crate::Metric;
use crate::capacity::CapacityAnalysis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ratio with the FTE figure behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRatio {
    pub hours_base: Decimal,
    pub fte_equivalent: Metric,
    pub students_per_fte: Metric,
}

/// Nominal and adjusted ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioAnalysis {
    /// Before final deductions.
    pub nominal: StaffRatio,
    /// After every deduction.
    pub adjusted: StaffRatio,
}

/// Students per FTE for a given hours base.
#[must_use]
pub fn staff_ratio(total_students: u32, hours_base: Decimal, nominal_fte_hours: Decimal) -> StaffRatio {
    if hours_base <= Decimal::ZERO {
        return StaffRatio {
            hours_base,
            fte_equivalent: Metric::NotApplicable,
            students_per_fte: Metric::NotApplicable,
        };
    }

    let fte_equivalent = Metric::ratio_positive(hours_base, nominal_fte_hours);
    let students_per_fte = match fte_equivalent {
        Metric::Value(fte) => Metric::ratio_positive(Decimal::from(total_students), fte),
        Metric::NotApplicable => Metric::NotApplicable,
    };

    StaffRatio {
        hours_base,
        fte_equivalent,
        students_per_fte,
    }
}

/// Both ratio variants for a capacity result.
#[must_use]
pub fn analyse_ratios(
    total_students: u32,
    capacity: &CapacityAnalysis,
    nominal_fte_hours: Decimal,
) -> RatioAnalysis {
    RatioAnalysis {
        nominal: staff_ratio(total_students, capacity.nominal_hours(), nominal_fte_hours),
        adjusted: staff_ratio(total_students, capacity.available_hours(), nominal_fte_hours),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ratio_for_positive_hours() {
        let r = staff_ratio(100, dec!(1600), dec!(800));
        assert_eq!(r.fte_equivalent, Metric::Value(dec!(2)));
        assert_eq!(r.students_per_fte, Metric::Value(dec!(50)));
    }

    #[test]
    fn ratio_undefined_for_zero_or_negative_hours() {
        assert_eq!(
            staff_ratio(100, Decimal::ZERO, dec!(800)).students_per_fte,
            Metric::NotApplicable
        );
        assert_eq!(
            staff_ratio(100, dec!(-40), dec!(800)).students_per_fte,
            Metric::NotApplicable
        );
    }

    #[test]
    fn ratio_undefined_for_zero_fte_hours() {
        let r = staff_ratio(100, dec!(1600), Decimal::ZERO);
        assert_eq!(r.fte_equivalent, Metric::NotApplicable);
        assert_eq!(r.students_per_fte, Metric::NotApplicable);
    }
}
