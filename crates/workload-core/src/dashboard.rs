//! # Dashboard
//!
//! Aggregate figures over stored submissions, for the administrator
//! overview.

use crate::capacity::BalanceStatus;
use crate::{Metric, SubmissionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals across a set of submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub submissions: u64,
    pub total_students: u64,
    pub total_delivery_hours: Decimal,
    /// Sum of each submission's required staff effort.
    pub total_staff_effort: Decimal,
    pub total_space: Decimal,
    pub shortfall_count: u64,
    /// Mean over submissions whose repetition factor was defined.
    pub mean_repetition_factor: Metric,
}

impl SubmissionSummary {
    /// Fold records into one summary.
    #[must_use]
    pub fn from_records(records: &[SubmissionRecord]) -> Self {
        let mut summary = Self {
            submissions: records.len() as u64,
            total_students: 0,
            total_delivery_hours: Decimal::ZERO,
            total_staff_effort: Decimal::ZERO,
            total_space: Decimal::ZERO,
            shortfall_count: 0,
            mean_repetition_factor: Metric::NotApplicable,
        };

        let mut repetition_sum = Decimal::ZERO;
        let mut repetition_count: u32 = 0;

        for record in records {
            summary.total_students += u64::from(record.input.total_students);
            summary.total_delivery_hours += record.input.total_delivery_hours;
            summary.total_staff_effort += record.metrics.demand();
            summary.total_space += record.metrics.total_space().unwrap_or_default();

            if record
                .metrics
                .balance
                .is_some_and(|b| b.status == BalanceStatus::Shortfall)
            {
                summary.shortfall_count += 1;
            }
            if let Some(factor) = record.metrics.repetition_factor().value() {
                repetition_sum += factor;
                repetition_count += 1;
            }
        }

        if repetition_count > 0 {
            summary.mean_repetition_factor =
                Metric::ratio(repetition_sum, Decimal::from(repetition_count)).rounded(4);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalculationEngine, ProgrammeInput, StaffAllocation, StaffCategory};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn record(id: u64, input: ProgrammeInput) -> SubmissionRecord {
        let metrics = CalculationEngine::default()
            .calculate(&input)
            .expect("calculate");
        SubmissionRecord::new(id, Utc::now(), input, metrics)
    }

    #[test]
    fn empty_summary() {
        let summary = SubmissionSummary::from_records(&[]);
        assert_eq!(summary.submissions, 0);
        assert_eq!(summary.total_staff_effort, Decimal::ZERO);
        assert_eq!(summary.mean_repetition_factor, Metric::NotApplicable);
    }

    #[test]
    fn totals_and_mean() {
        let records = vec![
            // repetition 500 / 40 = 12.5, effort 1533.4
            record(1, ProgrammeInput::new(100, dec!(40), dec!(500)).with_space(dec!(2))),
            // repetition 60 / 20 = 3
            record(2, ProgrammeInput::new(10, dec!(20), dec!(60))),
        ];
        let summary = SubmissionSummary::from_records(&records);

        assert_eq!(summary.submissions, 2);
        assert_eq!(summary.total_students, 110);
        assert_eq!(summary.total_delivery_hours, dec!(560));
        assert_eq!(summary.total_space, dec!(200));
        assert_eq!(summary.mean_repetition_factor, Metric::Value(dec!(7.75)));
    }

    #[test]
    fn undefined_repetition_is_skipped_in_mean() {
        let records = vec![
            record(1, ProgrammeInput::new(10, Decimal::ZERO, dec!(60))),
            record(2, ProgrammeInput::new(10, dec!(20), dec!(60))),
        ];
        let summary = SubmissionSummary::from_records(&records);
        assert_eq!(summary.mean_repetition_factor, Metric::Value(dec!(3)));
    }

    #[test]
    fn counts_shortfalls() {
        let short = ProgrammeInput::new(100, dec!(40), dec!(500))
            .with_staff(StaffCategory::Hop, StaffAllocation::fte(dec!(0.5)));
        let records = vec![record(1, short)];
        let summary = SubmissionSummary::from_records(&records);
        assert_eq!(summary.shortfall_count, 1);
    }
}
