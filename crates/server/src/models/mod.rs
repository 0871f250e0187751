//! Domain models for the dashboard API.
//!
//! Records serialize with camelCase keys, matching the wire format the
//! dashboard client already consumes. Request payloads that support partial
//! updates distinguish "field absent" (leave unchanged) from "field is null"
//! (clear the column) for nullable columns via [`double_option`].

pub mod dashboard;
pub mod grant;
pub mod lead;
pub mod pricing;
pub mod settings;
pub mod user;

pub use dashboard::{DashboardSummary, RoiReport};
pub use grant::{Grant, NewGrant};
pub use lead::{CreateLeadInput, Lead, LeadPatch, NewLead};
pub use pricing::PricingTier;
pub use settings::{Settings, SettingsPatch};
pub use user::{NewUser, User};

use serde::{Deserialize, Deserializer, de::Error as _};

/// Request payload whose validation errors are reported in field order.
pub trait FieldOrder {
    /// Field names as declared, used to pick the first failing one.
    const FIELDS: &'static [&'static str];
}

/// Deserialize a present field into `Some(value)`, where `value` may be `None`.
///
/// Combine with `#[serde(default)]` so an absent field becomes `None` and an
/// explicit `null` becomes `Some(None)`.
///
/// # Errors
///
/// Returns the deserializer's error if the value is not a valid `T`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize an optional field that may be absent but not `null`.
///
/// Combine with `#[serde(default)]` for partial updates of `NOT NULL` columns.
///
/// # Errors
///
/// Returns a "cannot be null" error for an explicit `null`, or the
/// deserializer's error if the value is not a valid `T`.
pub fn non_null<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| D::Error::custom("cannot be null"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "double_option")]
        value: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_absent_and_null() {
        let absent: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);

        let null: Wrapper = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(null.value, Some(None));

        let set: Wrapper = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(set.value, Some(Some("x".to_string())));
    }

    #[derive(Debug, Deserialize)]
    struct Required {
        #[serde(default, deserialize_with = "non_null")]
        value: Option<i32>,
    }

    #[test]
    fn test_non_null_rejects_explicit_null() {
        let absent: Required = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);

        let set: Required = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        assert_eq!(set.value, Some(3));

        let err = serde_json::from_str::<Required>(r#"{"value": null}"#).unwrap_err();
        assert!(err.to_string().contains("cannot be null"));
    }
}
