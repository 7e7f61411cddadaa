//! Request body extraction with schema validation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use beatstore_core::catalog::invalid_fields;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body that has been deserialized and then checked with
/// [`Validate`]. Rejects with 400 before the handler runs.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateRequest>) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate().map_err(validation_failure)?;

        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// Collapse validator output into one message naming every offending field.
fn validation_failure(errors: ValidationErrors) -> AppError {
    let fields = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    AppError::Core(invalid_fields(fields))
}

/// Numeric fields arrive either as JSON numbers or as numeric strings (HTML
/// form inputs, string ids). A blank string counts as absent.
pub mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match Option::<NumberOrText<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(n)) => Ok(Some(n)),
            Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(NumberOrText::Text(text)) => text.trim().parse().map(Some).map_err(D::Error::custom),
        }
    }
}
