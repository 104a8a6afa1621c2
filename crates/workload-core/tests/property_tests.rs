//! # Property-Based Tests
//!
//! Arithmetic laws of the engine, checked over generated inputs.
//!
//! These tests ensure determinism and correctness invariants.

use proptest::collection::vec;
use proptest::prelude::*;
use rust_decimal::Decimal;
use workload_core::capacity::{adjusted_hours, balance};
use workload_core::groups::analyse_groups;
use workload_core::{
    BalanceStatus, CalculationEngine, LearningGroup, Metric, ProgrammeInput, StaffAllocation,
    StaffCategory,
};

/// Non-negative decimal with one fractional digit.
fn tenths(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..max).prop_map(|v| Decimal::new(v, 1))
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Same input produces identical metrics.
    #[test]
    fn determinism_identical_input_produces_identical_output(
        students in 1u32..5000,
        validated in tenths(2000),
        delivery in tenths(100_000),
        fte in tenths(50),
    ) {
        let input = ProgrammeInput::new(students, validated, delivery)
            .with_staff(StaffCategory::Al, StaffAllocation::fte(fte));
        let engine = CalculationEngine::default();

        let first = engine.calculate(&input).expect("calculate");
        let second = engine.calculate(&input).expect("calculate");
        prop_assert_eq!(first, second);
    }

    /// The group count is the smallest whole number of groups covering every student.
    #[test]
    fn group_count_is_ceiling(students in 0u32..10_000, sizes in vec(1u32..200, 1..5)) {
        let groups: Vec<LearningGroup> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| LearningGroup::new(format!("G{}", i), size, Decimal::TEN))
            .collect();
        let analysis = analyse_groups(students, &groups, Decimal::ONE).expect("analyse");

        for g in &analysis.groups {
            let size = Decimal::from(g.size);
            let n = Decimal::from(students);
            prop_assert!(g.number_of_groups * size >= n);
            prop_assert!((g.number_of_groups - Decimal::ONE) * size < n || n.is_zero());
            prop_assert_eq!(g.number_of_groups, g.number_of_groups.trunc());
        }
    }

    /// Staff effort scales linearly with delivery hours.
    #[test]
    fn effort_is_linear_in_delivery(delivery in tenths(100_000), k in 1i64..10) {
        let engine = CalculationEngine::default();
        let k = Decimal::from(k);

        let one = engine
            .calculate(&ProgrammeInput::new(50, Decimal::TEN, delivery))
            .expect("calculate");
        let scaled = engine
            .calculate(&ProgrammeInput::new(50, Decimal::TEN, delivery * k))
            .expect("calculate");

        prop_assert_eq!(
            scaled.delivery.estimated_staff_effort,
            one.delivery.estimated_staff_effort * k
        );
    }

    /// Adjusted hours never go below zero, whatever the deductions.
    #[test]
    fn adjusted_hours_clamped(
        fte in tenths(30),
        buyout in tenths(50_000),
        remission in tenths(50_000),
    ) {
        let allocation = StaffAllocation::fte(fte)
            .with_buyout(buyout)
            .with_remission(remission);
        let hours = adjusted_hours(&allocation, Decimal::from(1365));
        prop_assert!(hours >= Decimal::ZERO);
        prop_assert!(hours <= fte * Decimal::from(1365));
    }

    /// Balance difference, status and magnitude agree.
    #[test]
    fn balance_is_consistent(available in tenths(1_000_000), demand in tenths(1_000_000)) {
        let b = balance(available, demand);
        prop_assert_eq!(b.difference, available - demand);
        prop_assert_eq!(b.magnitude, b.difference.abs());
        prop_assert_eq!(b.status == BalanceStatus::Surplus, available >= demand);
    }

    /// Ratios with a zero denominator are undefined, never zero.
    #[test]
    fn zero_denominator_is_not_applicable(numerator in tenths(1_000_000)) {
        prop_assert_eq!(Metric::ratio(numerator, Decimal::ZERO), Metric::NotApplicable);
    }

    /// Capacity never reports more hours than the staff nominally hold.
    #[test]
    fn available_never_exceeds_gross(
        fte in tenths(30),
        buyout in tenths(5000),
    ) {
        let input = ProgrammeInput::new(10, Decimal::TEN, Decimal::TEN).with_staff(
            StaffCategory::AefTeaching,
            StaffAllocation::fte(fte).with_buyout(buyout),
        );
        let metrics = CalculationEngine::default().calculate(&input).expect("calculate");
        let capacity = metrics.capacity.expect("capacity");
        prop_assert!(capacity.available_hours() <= fte * Decimal::from(1365));
        prop_assert!(capacity.available_hours() >= Decimal::ZERO);
    }
}
