//! # Staffing Capacity Analysis
//!
//! Hours the staff establishment can actually give to the programme.
//!
//! ## Models
//!
//! | Model | Used when | Result |
//! |-------|-----------|--------|
//! | Detailed | buyout, remission, other-teaching or unreplaced figures collected | `final_available_hours` |
//! | Simplified | FTE only | `total_staff_available` |
//!
//! Per-category hours are clamped at zero; the programme-level totals are
//! NOT clamped, because a negative figure is a real shortfall.

use crate::config::EngineConfig;
use crate::{
    DeductionCategory, OtherTeachingCategory, StaffAllocation, StaffCategory, UnreplacedHours,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// DETAILED MODEL
// =============================================================================

/// Available hours for one staff category after deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHours {
    pub fte: Decimal,
    pub nominal_annual_hours: Decimal,
    pub gross_hours: Decimal,
    pub buyout_hours: Decimal,
    pub remission_hours: Decimal,
    pub adjusted_hours: Decimal,
}

/// Detailed capacity breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedCapacity {
    pub categories: BTreeMap<StaffCategory, CategoryHours>,
    pub total_net_hours: Decimal,
    pub total_other_teaching_hours: Decimal,
    pub adjusted_net_hours: Decimal,
    pub total_unreplaced_hours: Decimal,
    pub final_available_hours: Decimal,
}

/// `max(0, fte * nominal - buyout - remission)`.
#[must_use]
pub fn adjusted_hours(allocation: &StaffAllocation, nominal_annual_hours: Decimal) -> Decimal {
    let gross = allocation.fte * nominal_annual_hours;
    let deductions = allocation.buyout_hours.unwrap_or_default()
        + allocation.remission_hours.unwrap_or_default();
    (gross - deductions).max(Decimal::ZERO)
}

/// Capacity after buyout, remission, external teaching and unreplaced losses.
#[must_use]
pub fn detailed_capacity(
    staffing: &BTreeMap<StaffCategory, StaffAllocation>,
    other_teaching_hours: &BTreeMap<OtherTeachingCategory, Decimal>,
    unreplaced_hours: &BTreeMap<DeductionCategory, UnreplacedHours>,
    config: &EngineConfig,
) -> DetailedCapacity {
    let categories: BTreeMap<StaffCategory, CategoryHours> = staffing
        .iter()
        .map(|(category, allocation)| {
            let nominal = config.annual_hours(*category);
            let hours = CategoryHours {
                fte: allocation.fte,
                nominal_annual_hours: nominal,
                gross_hours: allocation.fte * nominal,
                buyout_hours: allocation.buyout_hours.unwrap_or_default(),
                remission_hours: allocation.remission_hours.unwrap_or_default(),
                adjusted_hours: adjusted_hours(allocation, nominal),
            };
            (*category, hours)
        })
        .collect();

    let total_net_hours: Decimal = categories.values().map(|c| c.adjusted_hours).sum();
    let total_other_teaching_hours: Decimal = other_teaching_hours.values().copied().sum();
    let adjusted_net_hours = total_net_hours - total_other_teaching_hours;
    let total_unreplaced_hours: Decimal = unreplaced_hours.values().map(|u| u.hours).sum();

    DetailedCapacity {
        categories,
        total_net_hours,
        total_other_teaching_hours,
        adjusted_net_hours,
        total_unreplaced_hours,
        final_available_hours: adjusted_net_hours - total_unreplaced_hours,
    }
}

// =============================================================================
// SIMPLIFIED MODEL
// =============================================================================

/// FTE-only capacity with a flat contingency deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedCapacity {
    pub total_gross_hours: Decimal,
    pub contingency: Decimal,
    pub total_staff_available: Decimal,
}

/// `(Σ fte * nominal) * (1 - capacity_contingency)`.
#[must_use]
pub fn simplified_capacity(
    staffing: &BTreeMap<StaffCategory, StaffAllocation>,
    config: &EngineConfig,
) -> SimplifiedCapacity {
    let total_gross_hours: Decimal = staffing
        .iter()
        .map(|(category, allocation)| allocation.fte * config.annual_hours(*category))
        .sum();

    SimplifiedCapacity {
        total_gross_hours,
        contingency: config.capacity_contingency,
        total_staff_available: total_gross_hours * (Decimal::ONE - config.capacity_contingency),
    }
}

// =============================================================================
// CAPACITY (either model)
// =============================================================================

/// Result of whichever capacity model the input selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CapacityAnalysis {
    Detailed(DetailedCapacity),
    Simplified(SimplifiedCapacity),
}

impl CapacityAnalysis {
    /// Hours before the final deductions: net (detailed) or gross (simplified).
    #[must_use]
    pub fn nominal_hours(&self) -> Decimal {
        match self {
            Self::Detailed(d) => d.total_net_hours,
            Self::Simplified(s) => s.total_gross_hours,
        }
    }

    /// Hours actually available to the programme.
    #[must_use]
    pub fn available_hours(&self) -> Decimal {
        match self {
            Self::Detailed(d) => d.final_available_hours,
            Self::Simplified(s) => s.total_staff_available,
        }
    }
}

// =============================================================================
// SURPLUS / SHORTFALL
// =============================================================================

/// Sign of the capacity balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Surplus,
    Shortfall,
}

/// Available hours measured against required staff effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub available: Decimal,
    pub demand: Decimal,
    pub difference: Decimal,
    pub status: BalanceStatus,
    /// `|difference|`.
    pub magnitude: Decimal,
}

/// Compare capacity with demand. Zero difference counts as surplus.
#[must_use]
pub fn balance(available: Decimal, demand: Decimal) -> Balance {
    let difference = available - demand;
    let status = if difference >= Decimal::ZERO {
        BalanceStatus::Surplus
    } else {
        BalanceStatus::Shortfall
    };
    Balance {
        available,
        demand,
        difference,
        status,
        magnitude: difference.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn adjusted_hours_clamped_at_zero() {
        let allocation = StaffAllocation::fte(dec!(1.0)).with_buyout(dec!(900));
        assert_eq!(adjusted_hours(&allocation, dec!(752)), Decimal::ZERO);
    }

    #[test]
    fn adjusted_hours_subtracts_buyout_and_remission() {
        let allocation = StaffAllocation::fte(dec!(0.5))
            .with_buyout(dec!(100))
            .with_remission(dec!(50));
        assert_eq!(adjusted_hours(&allocation, dec!(1365)), dec!(532.5));
    }

    #[test]
    fn detailed_totals_are_not_clamped() {
        let mut staffing = BTreeMap::new();
        staffing.insert(
            StaffCategory::AefResearch,
            StaffAllocation::fte(dec!(1)).with_buyout(dec!(52)),
        );
        let mut other = BTreeMap::new();
        other.insert(OtherTeachingCategory::Supervision, dec!(600));
        let mut unreplaced = BTreeMap::new();
        unreplaced.insert(
            DeductionCategory::Illness,
            UnreplacedHours::new(dec!(200)).with_note("long-term absence"),
        );

        let capacity = detailed_capacity(&staffing, &other, &unreplaced, &EngineConfig::default());

        assert_eq!(capacity.total_net_hours, dec!(700));
        assert_eq!(capacity.adjusted_net_hours, dec!(100));
        assert_eq!(capacity.total_unreplaced_hours, dec!(200));
        assert_eq!(capacity.final_available_hours, dec!(-100));
    }

    #[test]
    fn simplified_applies_contingency() {
        let mut staffing = BTreeMap::new();
        staffing.insert(StaffCategory::AefTeaching, StaffAllocation::fte(dec!(2)));
        staffing.insert(StaffCategory::Hop, StaffAllocation::fte(dec!(1)));

        let capacity = simplified_capacity(&staffing, &EngineConfig::default());

        assert_eq!(capacity.total_gross_hours, dec!(3030));
        assert_eq!(capacity.total_staff_available, dec!(2727));
    }

    #[test]
    fn shortfall_reported_with_magnitude() {
        let b = balance(dec!(1000), dec!(1200));
        assert_eq!(b.status, BalanceStatus::Shortfall);
        assert_eq!(b.magnitude, dec!(200));
        assert_eq!(b.difference, dec!(-200));
    }

    #[test]
    fn exact_match_is_surplus() {
        let b = balance(dec!(500), dec!(500));
        assert_eq!(b.status, BalanceStatus::Surplus);
        assert_eq!(b.magnitude, Decimal::ZERO);
    }
}
