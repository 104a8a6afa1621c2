//! # Aggregate Delivery & Effort Analysis
//!
//! Figures derived from the programme-wide delivery hours alone.
//!
//! Two delivery ratios coexist because deployed forms disagreed on the
//! denominator: `delivery_multiplier` divides by the validated hours of the
//! whole cohort, `repetition_factor` by the validated hours of one student.
//! Both are reported; [`DeliveryBasis`] picks the headline.

use crate::Metric;
use crate::config::{DeliveryBasis, EngineConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived delivery and effort figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAnalysis {
    pub total_validated_hours: Decimal,
    pub delivery_multiplier: Metric,
    pub repetition_factor: Metric,
    pub base_staff_effort: Decimal,
    pub estimated_staff_effort: Decimal,
    pub staff_effort_per_validated_hour: Metric,
    pub contact_vs_effort_ratio: Metric,
}

impl DeliveryAnalysis {
    /// The delivery ratio selected by configuration.
    #[must_use]
    pub fn headline_delivery_ratio(&self, basis: DeliveryBasis) -> Metric {
        match basis {
            DeliveryBasis::Programme => self.delivery_multiplier,
            DeliveryBasis::PerStudent => self.repetition_factor,
        }
    }
}

/// Analyse aggregate delivery against validated contact hours.
#[must_use]
pub fn analyse_delivery(
    total_students: u32,
    validated_contact_hours_per_student: Decimal,
    total_delivery_hours: Decimal,
    config: &EngineConfig,
) -> DeliveryAnalysis {
    let total_validated_hours = Decimal::from(total_students) * validated_contact_hours_per_student;
    let base_staff_effort = total_delivery_hours * config.effort_multiplier;
    let estimated_staff_effort = base_staff_effort * (Decimal::ONE + config.contingency_buffer);

    DeliveryAnalysis {
        total_validated_hours,
        delivery_multiplier: Metric::ratio(total_delivery_hours, total_validated_hours),
        repetition_factor: Metric::ratio(total_delivery_hours, validated_contact_hours_per_student),
        base_staff_effort,
        estimated_staff_effort,
        staff_effort_per_validated_hour: Metric::ratio(
            estimated_staff_effort,
            total_validated_hours,
        ),
        contact_vs_effort_ratio: Metric::ratio(total_delivery_hours, estimated_staff_effort),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn observed_scenario() {
        let analysis = analyse_delivery(100, dec!(40), dec!(500), &EngineConfig::default());

        assert_eq!(analysis.total_validated_hours, dec!(4000));
        assert_eq!(analysis.repetition_factor, Metric::Value(dec!(12.5)));
        assert_eq!(analysis.delivery_multiplier, Metric::Value(dec!(0.125)));
        assert_eq!(analysis.base_staff_effort, dec!(1394.0));
        assert_eq!(analysis.estimated_staff_effort, dec!(1533.4));
    }

    #[test]
    fn zero_validated_hours_is_not_applicable() {
        let analysis = analyse_delivery(100, Decimal::ZERO, dec!(500), &EngineConfig::default());

        assert_eq!(analysis.delivery_multiplier, Metric::NotApplicable);
        assert_eq!(analysis.repetition_factor, Metric::NotApplicable);
        assert_eq!(analysis.staff_effort_per_validated_hour, Metric::NotApplicable);
        assert!(analysis.contact_vs_effort_ratio.is_applicable());
    }

    #[test]
    fn zero_delivery_hours_leaves_effort_ratio_undefined() {
        let analysis = analyse_delivery(100, dec!(40), Decimal::ZERO, &EngineConfig::default());

        assert_eq!(analysis.estimated_staff_effort, Decimal::ZERO);
        assert_eq!(analysis.delivery_multiplier, Metric::Value(Decimal::ZERO));
        assert_eq!(analysis.contact_vs_effort_ratio, Metric::NotApplicable);
    }

    #[test]
    fn headline_follows_basis() {
        let analysis = analyse_delivery(100, dec!(40), dec!(500), &EngineConfig::default());
        assert_eq!(
            analysis.headline_delivery_ratio(DeliveryBasis::PerStudent),
            Metric::Value(dec!(12.5))
        );
        assert_eq!(
            analysis.headline_delivery_ratio(DeliveryBasis::Programme),
            Metric::Value(dec!(0.125))
        );
    }
}
