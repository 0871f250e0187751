//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::models::FieldOrder;

/// Prefix axum puts in front of serde errors.
const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// JSON body that has been deserialized and validated.
///
/// Rejections become `AppError::Validation` so every bad body gets the same
/// `{"message", "field"}` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FieldOrder,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;
        value
            .validate()
            .map_err(|e| validation_error(&e, T::FIELDS))?;
        Ok(Self(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    let field = match &rejection {
        JsonRejection::JsonDataError(_) => field_from_serde_message(&message),
        _ => String::new(),
    };
    AppError::validation(field, message)
}

/// `"...: riskScore: invalid type ..."` -> `"riskScore"`.
fn field_from_serde_message(message: &str) -> String {
    message
        .strip_prefix(DESERIALIZE_PREFIX)
        .and_then(|rest| rest.split_once(": "))
        .map(|(path, _)| path)
        .filter(|path| !path.is_empty() && !path.contains(char::is_whitespace))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Report the first failing field in `order`. Fields missing from `order`
/// sort after it, by name.
pub(crate) fn validation_error(errors: &ValidationErrors, order: &[&str]) -> AppError {
    let first = errors.field_errors().into_iter().min_by_key(|(field, _)| {
        let position = order
            .iter()
            .position(|f| *f == &**field)
            .unwrap_or(order.len());
        (position, field.clone())
    });
    let first = first.map(|(field, errs)| (snake_to_camel(&field), errs));

    let Some((field, errs)) = first else {
        return AppError::validation("", "Invalid request body");
    };

    let message = errs
        .first()
        .map(|e| {
            e.message
                .as_ref()
                .map_or_else(|| e.code.to_string(), ToString::to_string)
        })
        .unwrap_or_else(|| "Invalid value".to_string());

    AppError::validation(field, message)
}

/// `risk_score` -> `riskScore`.
fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
