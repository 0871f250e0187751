//! Status enums for various entities.
//!
//! Leads store their status as free text so that operators can record values
//! outside the conventional pipeline. [`LeadStatus`] names the conventional
//! values and is used for aggregation and display.

use serde::{Deserialize, Serialize};

/// Sales pipeline status of a lead (New → Contacted → Service Scheduled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    #[serde(rename = "Service Scheduled")]
    ServiceScheduled,
}

impl LeadStatus {
    /// All statuses in pipeline order.
    pub const ALL: [Self; 3] = [Self::New, Self::Contacted, Self::ServiceScheduled];

    /// The stored text form of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::ServiceScheduled => "Service Scheduled",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid lead status: {s}"))
    }
}

/// Role assigned to a dashboard user.
///
/// Stored as text; only `admin` is created by the signup path today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Admin,
    Technician,
    Viewer,
}

impl UserRole {
    /// The stored text form of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Technician => "technician",
            Self::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "technician" => Ok(Self::Technician),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_status_text_roundtrip() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_lead_status_parse_is_case_insensitive() {
        assert_eq!(
            "service scheduled".parse::<LeadStatus>().unwrap(),
            LeadStatus::ServiceScheduled
        );
        assert!("Closed".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_lead_status_serde_uses_display_text() {
        let json = serde_json::to_string(&LeadStatus::ServiceScheduled).unwrap();
        assert_eq!(json, "\"Service Scheduled\"");
    }

    #[test]
    fn test_user_role_default_is_admin() {
        assert_eq!(UserRole::default().to_string(), "admin");
        assert_eq!("viewer".parse::<UserRole>().unwrap(), UserRole::Viewer);
        assert!("root".parse::<UserRole>().is_err());
    }
}
