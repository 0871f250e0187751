//! Risk banding for predicted equipment failure scores.

use serde::{Deserialize, Serialize};

/// Scores above this are high risk.
pub const HIGH_RISK_THRESHOLD: i32 = 70;

/// Scores above this (and not high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: i32 = 40;

/// Coarse band for a 0-100 risk score, used for dashboard colouring and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Band a risk score. Scores are not clamped; anything above 70 is high.
    #[must_use]
    pub const fn from_score(score: i32) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            Self::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskBand::from_score(0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(40), RiskBand::Low);
        assert_eq!(RiskBand::from_score(41), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(70), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(71), RiskBand::High);
        assert_eq!(RiskBand::from_score(92), RiskBand::High);
    }
}
