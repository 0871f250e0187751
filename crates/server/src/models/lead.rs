//! Sales leads tracked by the leads manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use hvac_dash_core::{LeadId, LeadStatus, RiskBand, SearchTerm};

use super::{FieldOrder, double_option, non_null};

/// A lead as stored.
///
/// `territory` and `status` are free text; the conventional values are
/// [`hvac_dash_core::Territory`] and [`LeadStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub address: String,
    pub territory: String,
    pub unit_model: Option<String>,
    pub risk_score: i32,
    pub predicted_failure: Option<String>,
    pub status: String,
    pub last_contact: Option<DateTime<Utc>>,
}

impl Lead {
    /// Build the stored record for a freshly inserted lead.
    #[must_use]
    pub fn from_new(id: LeadId, lead: NewLead) -> Self {
        Self {
            id,
            name: lead.name,
            address: lead.address,
            territory: lead.territory,
            unit_model: lead.unit_model,
            risk_score: lead.risk_score.unwrap_or(0),
            predicted_failure: lead.predicted_failure,
            status: lead
                .status
                .unwrap_or_else(|| LeadStatus::default().as_str().to_string()),
            last_contact: lead.last_contact,
        }
    }

    /// Risk band used for dashboard colouring.
    #[must_use]
    pub const fn risk_band(&self) -> RiskBand {
        RiskBand::from_score(self.risk_score)
    }

    /// Whether the name or address contains the search term.
    #[must_use]
    pub fn matches_search(&self, term: &SearchTerm) -> bool {
        term.matches_any([self.name.as_str(), self.address.as_str()])
    }

    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: &LeadPatch) {
        if let Some(v) = &patch.name {
            self.name.clone_from(v);
        }
        if let Some(v) = &patch.address {
            self.address.clone_from(v);
        }
        if let Some(v) = &patch.territory {
            self.territory.clone_from(v);
        }
        if let Some(v) = &patch.unit_model {
            self.unit_model.clone_from(v);
        }
        if let Some(v) = patch.risk_score {
            self.risk_score = v;
        }
        if let Some(v) = &patch.predicted_failure {
            self.predicted_failure.clone_from(v);
        }
        if let Some(v) = &patch.status {
            self.status.clone_from(v);
        }
        if let Some(v) = patch.last_contact {
            self.last_contact = v;
        }
    }
}

/// Insert payload for a lead. Unset optional columns take store defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub address: String,
    pub territory: String,
    pub unit_model: Option<String>,
    pub risk_score: Option<i32>,
    pub predicted_failure: Option<String>,
    pub status: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
}

impl NewLead {
    /// A lead with only the required columns set.
    #[must_use]
    pub fn new(name: &str, address: &str, territory: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            territory: territory.to_string(),
            unit_model: None,
            risk_score: None,
            predicted_failure: None,
            status: None,
            last_contact: None,
        }
    }
}

const LEAD_FIELDS: &[&str] = &[
    "name",
    "address",
    "territory",
    "unit_model",
    "risk_score",
    "predicted_failure",
    "status",
    "last_contact",
];

/// `POST /api/leads` body.
///
/// Required fields are `Option` so a missing field surfaces as a validation
/// error naming it rather than a deserializer error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Address is required")
    )]
    pub address: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Territory is required")
    )]
    pub territory: Option<String>,
    pub unit_model: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Risk score must be between 0 and 100"))]
    pub risk_score: Option<i32>,
    pub predicted_failure: Option<String>,
    #[validate(length(min = 1, message = "Status cannot be empty"))]
    pub status: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
}

impl FieldOrder for CreateLeadInput {
    const FIELDS: &'static [&'static str] = LEAD_FIELDS;
}

impl CreateLeadInput {
    /// Convert a validated input into an insert payload.
    #[must_use]
    pub fn into_new_lead(self) -> NewLead {
        NewLead {
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            territory: self.territory.unwrap_or_default(),
            unit_model: self.unit_model,
            risk_score: self.risk_score,
            predicted_failure: self.predicted_failure,
            status: self.status,
            last_contact: self.last_contact,
        }
    }
}

/// `PATCH /api/leads/{id}` body. Absent fields are left unchanged; `null`
/// clears a nullable column and is rejected for the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(default, deserialize_with = "non_null")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    #[validate(length(min = 1, message = "Territory cannot be empty"))]
    pub territory: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub unit_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "non_null")]
    #[validate(range(min = 0, max = 100, message = "Risk score must be between 0 and 100"))]
    pub risk_score: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub predicted_failure: Option<Option<String>>,
    #[serde(default, deserialize_with = "non_null")]
    #[validate(length(min = 1, message = "Status cannot be empty"))]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_contact: Option<Option<DateTime<Utc>>>,
}

impl FieldOrder for LeadPatch {
    const FIELDS: &'static [&'static str] = LEAD_FIELDS;
}

impl LeadPatch {
    /// Whether no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.territory.is_none()
            && self.unit_model.is_none()
            && self.risk_score.is_none()
            && self.predicted_failure.is_none()
            && self.status.is_none()
            && self.last_contact.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Lead {
        Lead::from_new(
            LeadId::new(4),
            NewLead {
                unit_model: Some("Daikin Rebel".to_string()),
                risk_score: Some(12),
                predicted_failure: Some("None".to_string()),
                ..NewLead::new("RBC Plaza", "200 Bay St, Toronto", "Downtown Core")
            },
        )
    }

    #[test]
    fn test_from_new_applies_defaults() {
        let lead = Lead::from_new(
            LeadId::new(1),
            NewLead::new("Acme Tower", "1 King St W", "Downtown Core"),
        );
        assert_eq!(lead.risk_score, 0);
        assert_eq!(lead.status, "New");
        assert_eq!(lead.unit_model, None);
    }

    #[test]
    fn test_matches_search_on_name_or_address() {
        let lead = sample();
        assert!(lead.matches_search(&SearchTerm::new("plaza")));
        assert!(lead.matches_search(&SearchTerm::new("bay st")));
        assert!(!lead.matches_search(&SearchTerm::new("vaughan")));
    }

    #[test]
    fn test_apply_patch_and_null_clear() {
        let mut lead = sample();
        let patch: LeadPatch =
            serde_json::from_str(r#"{"status": "Contacted", "unitModel": null}"#).unwrap();
        lead.apply(&patch);

        assert_eq!(lead.status, "Contacted");
        assert_eq!(lead.unit_model, None);
        assert_eq!(lead.predicted_failure.as_deref(), Some("None"));
        assert_eq!(lead.risk_score, 12);
    }

    #[test]
    fn test_create_input_requires_name() {
        let input: CreateLeadInput =
            serde_json::from_str(r#"{"address": "1 Main St", "territory": "Vaughan-East"}"#)
                .unwrap();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
    }

    #[test]
    fn test_create_input_rejects_out_of_range_score() {
        let input = CreateLeadInput {
            name: Some("A".to_string()),
            address: Some("B".to_string()),
            territory: Some("C".to_string()),
            risk_score: Some(150),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_input_into_new_lead() {
        let input: CreateLeadInput = serde_json::from_str(
            r#"{"name": "Acme", "address": "1 Main St", "territory": "Vaughan-East", "riskScore": 55}"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());
        let new_lead = input.into_new_lead();
        assert_eq!(new_lead.name, "Acme");
        assert_eq!(new_lead.risk_score, Some(55));
        assert_eq!(new_lead.status, None);
    }

    #[test]
    fn test_patch_rejects_null_for_required_columns() {
        for body in [
            r#"{"name": null}"#,
            r#"{"address": null}"#,
            r#"{"territory": null}"#,
            r#"{"riskScore": null}"#,
            r#"{"status": null}"#,
        ] {
            let err = serde_json::from_str::<LeadPatch>(body).unwrap_err();
            assert!(err.to_string().contains("cannot be null"), "{body}: {err}");
        }
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(LeadPatch::default().is_empty());
        let patch: LeadPatch = serde_json::from_str(r#"{"lastContact": null}"#).unwrap();
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["riskScore"], 12);
        assert_eq!(json["unitModel"], "Daikin Rebel");
        assert!(json["lastContact"].is_null());
    }
}
