//! Annual savings projection for the ROI calculator.
//!
//! The projection is a fixed formula over two operator-supplied cost
//! assumptions:
//!
//! ```text
//! savings = truck_roll_cost × 12 × 0.3 + energy_waste_cost × 0.2
//! ```
//!
//! i.e. one truck roll a month with 30% of them avoided, plus a 20% efficiency
//! gain on annual energy waste. Arithmetic is decimal so `250 / 1200` projects
//! to exactly `1140`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default cost of a single truck roll (CAD).
pub const DEFAULT_TRUCK_ROLL_COST: i32 = 250;

/// Default annual energy waste per household (CAD).
pub const DEFAULT_ENERGY_WASTE_COST: i32 = 1200;

/// Truck rolls per year assumed by the projection.
const TRUCK_ROLLS_PER_YEAR: i64 = 12;

/// Inputs to the savings projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiAssumptions {
    pub truck_roll_cost: Decimal,
    pub energy_waste_cost: Decimal,
}

/// Result of the savings projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiProjection {
    /// Savings from avoided truck rolls.
    pub truck_roll_savings: Decimal,
    /// Savings from the efficiency gain.
    pub energy_savings: Decimal,
    /// Sum of both.
    pub total_annual_savings: Decimal,
}

impl RoiAssumptions {
    /// Build assumptions from whole-dollar amounts.
    #[must_use]
    pub fn new(truck_roll_cost: i64, energy_waste_cost: i64) -> Self {
        Self {
            truck_roll_cost: Decimal::from(truck_roll_cost),
            energy_waste_cost: Decimal::from(energy_waste_cost),
        }
    }

    /// Fraction of truck rolls avoided (30%).
    #[must_use]
    pub fn truck_roll_reduction() -> Decimal {
        Decimal::new(3, 1)
    }

    /// Efficiency gain on energy waste (20%).
    #[must_use]
    pub fn energy_efficiency_gain() -> Decimal {
        Decimal::new(2, 1)
    }

    /// Project annual savings.
    #[must_use]
    pub fn project(&self) -> RoiProjection {
        let truck_roll_savings = (self.truck_roll_cost
            * Decimal::from(TRUCK_ROLLS_PER_YEAR)
            * Self::truck_roll_reduction())
        .normalize();
        let energy_savings = (self.energy_waste_cost * Self::energy_efficiency_gain()).normalize();

        RoiProjection {
            truck_roll_savings,
            energy_savings,
            total_annual_savings: (truck_roll_savings + energy_savings).normalize(),
        }
    }
}

impl Default for RoiAssumptions {
    fn default() -> Self {
        Self::new(
            i64::from(DEFAULT_TRUCK_ROLL_COST),
            i64::from(DEFAULT_ENERGY_WASTE_COST),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projection() {
        let projection = RoiAssumptions::default().project();

        assert_eq!(projection.truck_roll_savings, Decimal::from(900));
        assert_eq!(projection.energy_savings, Decimal::from(240));
        assert_eq!(projection.total_annual_savings, Decimal::from(1140));
    }

    #[test]
    fn test_zero_costs_project_zero() {
        let projection = RoiAssumptions::new(0, 0).project();
        assert_eq!(projection.total_annual_savings, Decimal::ZERO);
    }

    #[test]
    fn test_fractional_savings_are_exact() {
        // 255 × 12 × 0.3 = 918, 1205 × 0.2 = 241
        let projection = RoiAssumptions::new(255, 1205).project();
        assert_eq!(projection.total_annual_savings, Decimal::from(1159));

        // 1 × 12 × 0.3 = 3.6, 1 × 0.2 = 0.2
        let projection = RoiAssumptions::new(1, 1).project();
        assert_eq!(projection.total_annual_savings, Decimal::new(38, 1));
    }
}
