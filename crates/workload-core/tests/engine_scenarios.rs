//! # Engine Scenario Tests
//!
//! End-to-end calculations against worked figures.
//!
//! ## Groups
//! - Delivery: aggregate effort and zero guards
//! - Groups: repetition and group effort
//! - Capacity: model selection, clamping and balance
//! - Rejection: invalid input never reaches the arithmetic

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use workload_core::primitives::{MAX_MULTIPLIER, MAX_QUANTITY, MAX_QUANTITY_SCALE, MAX_STUDENTS};
use workload_core::{
    BalanceStatus, CalculationEngine, CapacityAnalysis, DeductionCategory, EngineConfig,
    LearningGroup, Metric, OtherTeachingCategory, ProgrammeInput, StaffAllocation, StaffCategory,
    UnreplacedHours, WorkloadError,
};

fn engine() -> CalculationEngine {
    CalculationEngine::default()
}

// =============================================================================
// DELIVERY
// =============================================================================

mod delivery {
    use super::*;

    #[test]
    fn hundred_students_forty_validated_five_hundred_delivered() {
        let metrics = engine()
            .calculate(&ProgrammeInput::new(100, dec!(40), dec!(500)))
            .expect("calculate");

        assert_eq!(metrics.delivery.repetition_factor, Metric::Value(dec!(12.5)));
        assert_eq!(metrics.delivery.base_staff_effort, dec!(1394.0));
        assert_eq!(metrics.delivery.estimated_staff_effort, dec!(1533.4));
        assert_eq!(metrics.demand(), dec!(1533.4));
    }

    #[test]
    fn zero_validated_hours_is_not_applicable() {
        let metrics = engine()
            .calculate(&ProgrammeInput::new(100, Decimal::ZERO, dec!(500)))
            .expect("calculate");

        assert_eq!(metrics.delivery.delivery_multiplier, Metric::NotApplicable);
        assert_eq!(
            metrics.delivery.staff_effort_per_validated_hour,
            Metric::NotApplicable
        );
        assert_eq!(metrics.delivery.estimated_staff_effort, dec!(1533.4));
    }

    #[test]
    fn zero_delivery_is_a_computed_zero() {
        let metrics = engine()
            .calculate(&ProgrammeInput::new(10, dec!(5), Decimal::ZERO))
            .expect("calculate");

        assert_eq!(metrics.delivery.delivery_multiplier, Metric::Value(Decimal::ZERO));
        assert_eq!(metrics.delivery.contact_vs_effort_ratio, Metric::NotApplicable);
    }

    #[test]
    fn identical_input_identical_output() {
        let input = ProgrammeInput::new(77, dec!(12.5), dec!(333.3))
            .with_groups(vec![LearningGroup::new("Studio", 12, dec!(30))])
            .with_staff(StaffCategory::AefResearch, StaffAllocation::fte(dec!(0.4)));

        let first = serde_json::to_string(&engine().calculate(&input).expect("first")).expect("json");
        let second =
            serde_json::to_string(&engine().calculate(&input).expect("second")).expect("json");
        assert_eq!(first, second);
    }
}

// =============================================================================
// GROUPS
// =============================================================================

mod groups {
    use super::*;

    #[test]
    fn forty_seven_students_in_tens() {
        let input = ProgrammeInput::new(47, dec!(20), dec!(200))
            .with_groups(vec![LearningGroup::new("Tutorial", 10, dec!(50))]);
        let metrics = engine().calculate(&input).expect("calculate");
        let groups = metrics.groups.as_ref().expect("groups");

        assert_eq!(groups.groups[0].number_of_groups, dec!(5));
        assert_eq!(groups.groups[0].repetition_multiplier, dec!(4.7));
        assert_eq!(groups.groups[0].estimated_staff_effort, dec!(165.5));
        assert_eq!(metrics.demand(), dec!(165.5));
    }

    #[test]
    fn doubling_one_group_shifts_total_by_its_contribution() {
        let base = vec![
            LearningGroup::new("Seminar", 15, dec!(20)),
            LearningGroup::new("Lab", 8, dec!(12)),
        ];
        let mut doubled = base.clone();
        doubled[1].hours = dec!(24);

        let input = |groups| ProgrammeInput::new(40, dec!(10), dec!(100)).with_groups(groups);
        let a = engine().calculate(&input(base)).expect("a").groups.expect("groups");
        let b = engine()
            .calculate(&input(doubled))
            .expect("b")
            .groups
            .expect("groups");

        assert_eq!(a.groups[0], b.groups[0]);
        assert_eq!(
            b.total_staff_effort - a.total_staff_effort,
            a.groups[1].estimated_staff_effort
        );
    }

    #[test]
    fn group_size_zero_rejected() {
        let input = ProgrammeInput::new(47, dec!(20), dec!(200)).with_groups(vec![
            LearningGroup::new("Seminar", 10, dec!(5)),
            LearningGroup::new("Broken", 0, dec!(5)),
        ]);
        let result = engine().calculate(&input);
        assert!(matches!(
            result,
            Err(WorkloadError::InvalidInput { ref field, .. }) if field == "learning_groups[1].size"
        ));
    }
}

// =============================================================================
// CAPACITY
// =============================================================================

mod capacity {
    use super::*;

    #[test]
    fn buyout_beyond_allocation_clamps_to_zero() {
        let input = ProgrammeInput::new(10, dec!(10), dec!(10)).with_staff(
            StaffCategory::AefResearch,
            StaffAllocation::fte(dec!(1.0)).with_buyout(dec!(900)),
        );
        let metrics = engine().calculate(&input).expect("calculate");

        let Some(CapacityAnalysis::Detailed(detailed)) = metrics.capacity else {
            unreachable!("buyout selects the detailed model");
        };
        let hours = detailed.categories[&StaffCategory::AefResearch];
        assert_eq!(hours.gross_hours, dec!(752));
        assert_eq!(hours.adjusted_hours, Decimal::ZERO);
    }

    #[test]
    fn fte_only_selects_simplified_model() {
        let input = ProgrammeInput::new(10, dec!(10), dec!(10))
            .with_staff(StaffCategory::Hop, StaffAllocation::fte(dec!(2)));
        let metrics = engine().calculate(&input).expect("calculate");

        let Some(CapacityAnalysis::Simplified(simplified)) = metrics.capacity else {
            unreachable!("fte-only staffing selects the simplified model");
        };
        assert_eq!(simplified.total_gross_hours, dec!(600));
        assert_eq!(simplified.total_staff_available, dec!(540));
    }

    #[test]
    fn detailed_model_subtracts_every_deduction() {
        let input = ProgrammeInput::new(30, dec!(10), dec!(10))
            .with_staff(
                StaffCategory::Al,
                StaffAllocation::fte(dec!(2)).with_remission(dec!(106)),
            )
            .with_other_teaching(OtherTeachingCategory::Supervision, dec!(200))
            .with_unreplaced(DeductionCategory::Illness, UnreplacedHours::new(dec!(100)));
        let metrics = engine().calculate(&input).expect("calculate");

        let Some(CapacityAnalysis::Detailed(detailed)) = &metrics.capacity else {
            unreachable!("deductions select the detailed model");
        };
        assert_eq!(detailed.total_net_hours, dec!(2000));
        assert_eq!(detailed.adjusted_net_hours, dec!(1800));
        assert_eq!(detailed.final_available_hours, dec!(1700));

        let ratios = metrics.ratios.expect("ratios");
        // 2000 / 800 = 2.5 FTE; 30 / 2.5 = 12
        assert_eq!(ratios.nominal.students_per_fte, Metric::Value(dec!(12)));
    }

    #[test]
    fn thousand_available_against_twelve_hundred_is_shortfall() {
        let config = EngineConfig {
            staff_effort_multiplier: Decimal::ONE,
            ..EngineConfig::default()
        };
        let engine = CalculationEngine::new(config).expect("config");
        let input = ProgrammeInput::new(20, dec!(10), dec!(10))
            .with_groups(vec![LearningGroup::new("Studio", 20, dec!(1200))])
            .with_staff(
                StaffCategory::Al,
                StaffAllocation::fte(dec!(1)).with_remission(dec!(53)),
            );
        let balance = engine
            .calculate(&input)
            .expect("calculate")
            .balance
            .expect("balance");

        assert_eq!(balance.available, dec!(1000));
        assert_eq!(balance.demand, dec!(1200));
        assert_eq!(balance.status, BalanceStatus::Shortfall);
        assert_eq!(balance.magnitude, dec!(200));
    }

    #[test]
    fn no_staff_means_no_capacity_or_ratio() {
        let metrics = engine()
            .calculate(&ProgrammeInput::new(10, dec!(10), dec!(10)))
            .expect("calculate");
        assert!(metrics.capacity.is_none());
        assert!(metrics.ratios.is_none());
        assert!(metrics.balance.is_none());
    }

    #[test]
    fn zero_fte_ratio_is_not_applicable() {
        let input = ProgrammeInput::new(10, dec!(10), dec!(10))
            .with_staff(StaffCategory::Al, StaffAllocation::fte(Decimal::ZERO));
        let ratios = engine().calculate(&input).expect("calculate").ratios.expect("ratios");
        assert_eq!(ratios.nominal.students_per_fte, Metric::NotApplicable);
    }
}

// =============================================================================
// REJECTION
// =============================================================================

mod rejection {
    use super::*;

    #[test]
    fn zero_students_rejected() {
        let result = engine().calculate(&ProgrammeInput::new(0, dec!(10), dec!(10)));
        assert!(matches!(result, Err(WorkloadError::InvalidInput { .. })));
    }

    #[test]
    fn negative_hours_rejected() {
        let result = engine().calculate(&ProgrammeInput::new(10, dec!(-1), dec!(10)));
        assert!(matches!(
            result,
            Err(WorkloadError::InvalidInput { ref field, .. })
                if field == "validated_contact_hours_per_student"
        ));
    }

    #[test]
    fn bad_config_rejected() {
        let config = EngineConfig {
            nominal_fte_hours: Decimal::ZERO,
            ..EngineConfig::default()
        };
        assert!(matches!(
            CalculationEngine::new(config),
            Err(WorkloadError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn unbounded_multiplier_rejected_before_calculation() {
        let config = EngineConfig {
            effort_multiplier: Decimal::MAX,
            ..EngineConfig::default()
        };
        assert!(matches!(
            CalculationEngine::new(config),
            Err(WorkloadError::InvalidConfig { ref field, .. }) if field == "effort_multiplier"
        ));

        let mut config = EngineConfig::default();
        config
            .nominal_annual_hours
            .insert(StaffCategory::Al, Decimal::MAX);
        assert!(CalculationEngine::new(config).is_err());
    }

    #[test]
    fn extreme_accepted_values_still_calculate() {
        let max = Decimal::from(MAX_QUANTITY);
        let finest = Decimal::new(1, MAX_QUANTITY_SCALE);
        let mut config = EngineConfig {
            staff_effort_multiplier: Decimal::from(MAX_MULTIPLIER),
            effort_multiplier: Decimal::from(MAX_MULTIPLIER),
            nominal_fte_hours: finest,
            ..EngineConfig::default()
        };
        for category in StaffCategory::ALL {
            config.nominal_annual_hours.insert(category, max);
        }
        let engine = CalculationEngine::new(config).expect("bounded config accepted");

        let mut input = ProgrammeInput::new(MAX_STUDENTS, finest, max)
            .with_space(max)
            .with_groups(vec![LearningGroup::new("Tutorial", 1, max)]);
        for category in StaffCategory::ALL {
            input = input.with_staff(category, StaffAllocation::fte(max));
        }

        let metrics = engine.calculate(&input).expect("calculates");
        assert!(metrics.delivery.repetition_factor.is_applicable());
        assert!(metrics.delivery.delivery_multiplier.is_applicable());
        let ratios = metrics.ratios.expect("ratios");
        assert!(ratios.nominal.students_per_fte.is_applicable());

        // Smallest accepted validated hours still divide to a value.
        let tiny = ProgrammeInput::new(1, finest, dec!(1));
        let metrics = engine.calculate(&tiny).expect("calculates");
        assert_eq!(
            metrics.delivery.repetition_factor,
            Metric::Value(dec!(1000000))
        );
    }
}
