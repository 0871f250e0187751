//! Branding and ROI-assumption settings (singleton record).

use serde::{Deserialize, Serialize};
use validator::Validate;

use hvac_dash_core::roi::{DEFAULT_ENERGY_WASTE_COST, DEFAULT_TRUCK_ROLL_COST};
use hvac_dash_core::{RoiAssumptions, SettingsId};

use super::{FieldOrder, double_option};

/// The single per-deployment configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: SettingsId,
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    /// Theme tag, `navy` or `light`.
    pub theme: Option<String>,
    pub currency: Option<String>,
    pub truck_roll_cost: Option<i32>,
    pub energy_waste_cost: Option<i32>,
}

impl Settings {
    /// A fresh row as the store creates it when no fields are supplied.
    #[must_use]
    pub fn column_defaults() -> Self {
        Self {
            id: SettingsId::SINGLETON,
            company_name: Some("My HVAC Company".to_string()),
            logo_url: None,
            theme: Some("navy".to_string()),
            currency: Some("CAD".to_string()),
            truck_roll_cost: Some(DEFAULT_TRUCK_ROLL_COST),
            energy_waste_cost: Some(DEFAULT_ENERGY_WASTE_COST),
        }
    }

    /// What `GET /api/settings` returns before anything has been stored.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            company_name: Some("Toronto HVAC Solutions".to_string()),
            ..Self::column_defaults()
        }
    }

    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = &patch.company_name {
            self.company_name = Some(v.clone());
        }
        if let Some(v) = &patch.logo_url {
            self.logo_url.clone_from(v);
        }
        if let Some(v) = &patch.theme {
            self.theme = Some(v.clone());
        }
        if let Some(v) = &patch.currency {
            self.currency = Some(v.clone());
        }
        if let Some(v) = patch.truck_roll_cost {
            self.truck_roll_cost = Some(v);
        }
        if let Some(v) = patch.energy_waste_cost {
            self.energy_waste_cost = Some(v);
        }
    }

    /// ROI calculator inputs. Missing or zero costs fall back to the defaults.
    #[must_use]
    pub fn roi_assumptions(&self) -> RoiAssumptions {
        let truck_roll = self
            .truck_roll_cost
            .filter(|v| *v != 0)
            .unwrap_or(DEFAULT_TRUCK_ROLL_COST);
        let energy_waste = self
            .energy_waste_cost
            .filter(|v| *v != 0)
            .unwrap_or(DEFAULT_ENERGY_WASTE_COST);
        RoiAssumptions::new(i64::from(truck_roll), i64::from(energy_waste))
    }
}

/// Partial settings update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[validate(length(min = 1, message = "Company name cannot be empty"))]
    pub company_name: Option<String>,
    /// `null` clears the logo.
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
    #[validate(length(min = 1, message = "Theme cannot be empty"))]
    pub theme: Option<String>,
    #[validate(length(min = 1, message = "Currency cannot be empty"))]
    pub currency: Option<String>,
    #[validate(range(min = 0, message = "Truck roll cost cannot be negative"))]
    pub truck_roll_cost: Option<i32>,
    #[validate(range(min = 0, message = "Energy waste cost cannot be negative"))]
    pub energy_waste_cost: Option<i32>,
}

impl FieldOrder for SettingsPatch {
    const FIELDS: &'static [&'static str] = &[
        "company_name",
        "logo_url",
        "theme",
        "currency",
        "truck_roll_cost",
        "energy_waste_cost",
    ];
}

impl SettingsPatch {
    /// Column names of the present fields, in a fixed order.
    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.company_name.is_some() {
            columns.push("company_name");
        }
        if self.logo_url.is_some() {
            columns.push("logo_url");
        }
        if self.theme.is_some() {
            columns.push("theme");
        }
        if self.currency.is_some() {
            columns.push("currency");
        }
        if self.truck_roll_cost.is_some() {
            columns.push("truck_roll_cost");
        }
        if self.energy_waste_cost.is_some() {
            columns.push("energy_waste_cost");
        }
        columns
    }

    /// Whether no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_apply_partial_leaves_other_fields() {
        let mut settings = Settings::fallback();
        let patch = SettingsPatch {
            truck_roll_cost: Some(300),
            ..Default::default()
        };
        settings.apply(&patch);

        assert_eq!(settings.truck_roll_cost, Some(300));
        assert_eq!(settings.company_name.as_deref(), Some("Toronto HVAC Solutions"));
        assert_eq!(settings.energy_waste_cost, Some(1200));
    }

    #[test]
    fn test_apply_null_logo_clears() {
        let mut settings = Settings {
            logo_url: Some("/objects/uploads/logo.png".to_string()),
            ..Settings::column_defaults()
        };
        let patch: SettingsPatch = serde_json::from_str(r#"{"logoUrl": null}"#).unwrap();
        settings.apply(&patch);
        assert_eq!(settings.logo_url, None);
    }

    #[test]
    fn test_patch_columns_in_order() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"energyWasteCost": 1, "companyName": "A"}"#).unwrap();
        assert_eq!(patch.columns(), vec!["company_name", "energy_waste_cost"]);
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn test_patch_validation_rejects_negative_cost() {
        let patch = SettingsPatch {
            truck_roll_cost: Some(-1),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let ok = SettingsPatch {
            truck_roll_cost: Some(0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_roi_assumptions_fall_back_on_zero() {
        let settings = Settings {
            truck_roll_cost: Some(0),
            energy_waste_cost: None,
            ..Settings::column_defaults()
        };
        let projection = settings.roi_assumptions().project();
        assert_eq!(projection.total_annual_savings, Decimal::from(1140));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Settings::fallback()).unwrap();
        assert_eq!(json["companyName"], "Toronto HVAC Solutions");
        assert_eq!(json["truckRollCost"], 250);
        assert_eq!(json["id"], 1);
        assert!(json["logoUrl"].is_null());
    }
}
