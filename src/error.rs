use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] foodgram_shared::Error),

    #[error("Authentication credentials were not provided.")]
    Unauthorized,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found.")]
    NotFound,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<axum_extra::extract::QueryRejection> for ApiError {
    fn from(rejection: axum_extra::extract::QueryRejection) -> Self {
        ApiError::BadRequest(rejection.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_rejection: PathRejection) -> Self {
        ApiError::NotFound
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Domain(err.into())
    }
}

fn message(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "length" => "Ensure this field has a valid length.",
        "range" => "Ensure this value is within the allowed range.",
        "email" => "Enter a valid email address.",
        "regex" => "Enter a valid value.",
        _ => "Invalid value.",
    }
    .to_string()
}

/// Flattens nested errors into `{"ingredients[0].amount": [...]}` style keys.
fn collect(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(errors) => {
                out.entry(key)
                    .or_default()
                    .extend(errors.iter().map(message));
            }
            ValidationErrorsKind::Struct(errors) => collect(&key, errors, out),
            ValidationErrorsKind::List(items) => {
                for (index, errors) in items {
                    collect(&format!("{key}[{index}]"), errors, out);
                }
            }
        }
    }
}

pub fn validation_body(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect("", errors, &mut out);
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use foodgram_shared::Error;

        match self {
            ApiError::Domain(Error::Validate(errors)) => {
                (StatusCode::BAD_REQUEST, Json(validation_body(&errors))).into_response()
            }
            ApiError::Domain(Error::Field { field, message }) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ field: [message] })),
            )
                .into_response(),
            ApiError::Domain(Error::Conflict(message)) => {
                tracing::debug!(%message, "conflict");
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": message }))).into_response()
            }
            ApiError::Domain(Error::NotFound(message)) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Domain(Error::Forbidden(message)) => {
                (StatusCode::FORBIDDEN, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Domain(Error::Server(message)) => {
                tracing::error!(%message, "server error");
                internal_error()
            }
            ApiError::Domain(Error::Unknown(err)) => {
                tracing::error!(error = ?err, "unexpected error");
                internal_error()
            }
            ApiError::Unauthorized | ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": self.to_string() })),
            )
                .into_response(),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Not found." })),
            )
                .into_response(),
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Line {
        #[validate(range(min = 1, max = 1000))]
        amount: i64,
    }

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 1, message = "Name is required."))]
        name: String,
        #[validate(nested)]
        lines: Vec<Line>,
    }

    #[test]
    fn test_validation_body_flattens_nested_errors() {
        let errors = Input {
            name: "".to_owned(),
            lines: vec![Line { amount: 1 }, Line { amount: 0 }],
        }
        .validate()
        .unwrap_err();

        let body = validation_body(&errors);
        assert_eq!(body["name"], vec!["Name is required.".to_owned()]);
        assert_eq!(
            body["lines[1].amount"],
            vec!["Ensure this value is within the allowed range.".to_owned()]
        );
        assert_eq!(body.len(), 2);
    }
}
