//! Service territories across the Greater Toronto Area.

use serde::{Deserialize, Serialize};

/// A sales/service territory.
///
/// Leads keep their territory as free text; this enum covers the territories
/// the dashboard offers when creating a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Territory {
    #[serde(rename = "Vaughan-East")]
    VaughanEast,
    #[serde(rename = "Scarborough-South")]
    ScarboroughSouth,
    #[serde(rename = "Etobicoke-Central")]
    EtobicokeCentral,
    #[default]
    #[serde(rename = "Downtown Core")]
    DowntownCore,
}

impl Territory {
    /// All territories, in the order the lead form lists them.
    pub const ALL: [Self; 4] = [
        Self::VaughanEast,
        Self::ScarboroughSouth,
        Self::EtobicokeCentral,
        Self::DowntownCore,
    ];

    /// The stored text form of this territory.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VaughanEast => "Vaughan-East",
            Self::ScarboroughSouth => "Scarborough-South",
            Self::EtobicokeCentral => "Etobicoke-Central",
            Self::DowntownCore => "Downtown Core",
        }
    }
}

impl std::fmt::Display for Territory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Territory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|territory| territory.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown territory: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_territories() {
        assert_eq!(
            "Vaughan-East".parse::<Territory>().unwrap(),
            Territory::VaughanEast
        );
        assert_eq!(
            " downtown core ".parse::<Territory>().unwrap(),
            Territory::DowntownCore
        );
    }

    #[test]
    fn test_parse_unknown_territory() {
        assert!("Mississauga".parse::<Territory>().is_err());
    }

    #[test]
    fn test_default_matches_lead_form() {
        assert_eq!(Territory::default().as_str(), "Downtown Core");
    }
}
