//! JSON body extractor that runs `validator` rules before the handler

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// `Json<T>` plus `Validate`. Malformed bodies are 400, rule violations are
/// 422 with one `field: message` entry per failed rule, fields sorted.
///
/// ```ignore
/// async fn create_company(
///     ValidatedJson(request): ValidatedJson<CreateCompanyRequest>,
/// ) -> ApiResult<...> {
///     // request.name is 2-120 characters here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

fn malformed(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
}

fn violations(errors: &ValidationErrors) -> ApiError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    ApiError::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        "validation",
        if message.is_empty() {
            "Validation failed".to_string()
        } else {
            message
        },
    )
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(malformed)?;
        value.validate().map_err(|e| violations(&e))?;
        Ok(ValidatedJson(value))
    }
}
