//! Government grant and rebate programs.

use serde::{Deserialize, Serialize};

use hvac_dash_core::GrantId;

/// A grant program with eligibility and uptake counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    pub id: GrantId,
    pub program_name: String,
    pub description: Option<String>,
    pub eligible_count: i32,
    pub active_count: i32,
    pub avg_grant_value: i32,
}

impl Grant {
    #[must_use]
    pub fn from_new(id: GrantId, grant: NewGrant) -> Self {
        Self {
            id,
            program_name: grant.program_name,
            description: grant.description,
            eligible_count: grant.eligible_count,
            active_count: grant.active_count,
            avg_grant_value: grant.avg_grant_value,
        }
    }

    /// Share of eligible customers with an active application, in percent.
    ///
    /// A program with no eligible customers is treated as having one.
    #[must_use]
    pub fn uptake_percent(&self) -> f64 {
        let eligible = if self.eligible_count == 0 {
            1
        } else {
            self.eligible_count
        };
        f64::from(self.active_count) / f64::from(eligible) * 100.0
    }

    /// Total value if every eligible customer claimed the average grant.
    #[must_use]
    pub fn potential_value(&self) -> i64 {
        i64::from(self.eligible_count) * i64::from(self.avg_grant_value)
    }
}

/// Insert payload for a grant (seed only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrant {
    pub program_name: String,
    pub description: Option<String>,
    pub eligible_count: i32,
    pub active_count: i32,
    pub avg_grant_value: i32,
}
