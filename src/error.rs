//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Handlers never build error responses themselves: they return an `AppError` (usually
//! through `?`) and its `ResponseError` implementation renders the uniform client-facing
//! shape `{ status, message, errors? }`.
//!
//! Conversions exist for `validator::ValidationErrors` (per-field message map),
//! `StoreError` (unique violations become 409 conflicts), `jsonwebtoken` errors (distinct
//! expired vs invalid messages) and `bcrypt` failures. Internal failures are reduced to a
//! generic message; in development mode `expose_details` re-renders them with the detail.

use actix_web::{
    body::EitherBody,
    dev::ServiceResponse,
    error::{BlockingError, JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::StatusCode,
    middleware::ErrorHandlerResponse,
    HttpRequest, HttpResponse,
};
use jsonwebtoken::errors::ErrorKind;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use validator::{ValidationError, ValidationErrors};

use crate::store::StoreError;

/// Message sent to clients in place of any internal failure outside development mode.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went very wrong!";
pub const TOKEN_EXPIRED_MESSAGE: &str = "Your token has expired! Please log in again.";
pub const TOKEN_INVALID_MESSAGE: &str = "Invalid token. Please log in again!";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input failed validation (HTTP 400). Keyed by request field name.
    #[error("Validation failed")]
    Validation { errors: BTreeMap<String, String> },
    /// The request could not be parsed (HTTP 400).
    #[error("{0}")]
    BadRequest(String),
    /// Authentication is missing or failed (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),
    /// The caller is authenticated but does not own the resource (HTTP 403).
    #[error("{0}")]
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),
    /// A unique constraint was violated (HTTP 409).
    #[error("{message}")]
    Conflict { field: String, message: String },
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Failure reported by the credential store (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl AppError {
    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::InternalServerError(_) | AppError::DatabaseError(_)
        )
    }

    fn field_errors(&self) -> Option<BTreeMap<String, String>> {
        match self {
            AppError::Validation { errors } => Some(errors.clone()),
            AppError::Conflict { field, message } => {
                Some(BTreeMap::from([(field.clone(), message.clone())]))
            }
            _ => None,
        }
    }

    fn body(&self, detailed: bool) -> Value {
        let status = if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        };
        let message = if self.is_internal() && !detailed {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let mut body = json!({ "status": status, "message": message });
        if let Some(errors) = self.field_errors() {
            body["errors"] = json!(errors);
        }
        if detailed {
            body["error"] = json!(format!("{:?}", self));
        }
        body
    }

    /// Development-mode rendering: the real message plus the debug representation.
    pub fn detailed_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body(true))
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(self.body(false))
    }
}

/// Re-renders `AppError` responses with internal details. Registered through
/// `ErrorHandlers` only when running in development mode.
pub fn expose_details<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let detailed = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .map(AppError::detailed_response);

    let res: ServiceResponse<EitherBody<B>> = match detailed {
        Some(response) => res.into_response(response).map_into_right_body(),
        None => res.map_into_left_body(),
    };
    Ok(ErrorHandlerResponse::Response(res))
}

/// Only syntax and transport failures land here: handlers extract bodies as
/// `web::Json<Value>` and type them with [`parse_json`].
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match err {
        JsonPayloadError::Deserialize(_) => "Request body is not valid JSON".to_string(),
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        other => format!("Invalid request body: {}", other),
    };
    AppError::BadRequest(message).into()
}

/// Types a JSON body. Missing fields, wrong types and unknown enum values come back
/// as a `Validation` error keyed by the offending field.
pub fn parse_json<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_path_to_error::deserialize(body).map_err(|err| {
        let path = err.path().to_string();
        let detail = err.inner().to_string();
        match describe_deserialize_error(&path, &detail) {
            Some((field, message)) => AppError::Validation {
                errors: BTreeMap::from([(field, message)]),
            },
            None => AppError::BadRequest("Request body must be a JSON object".into()),
        }
    })
}

fn backticked<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    message.strip_prefix(prefix)?.split('`').next()
}

fn describe_deserialize_error(path: &str, detail: &str) -> Option<(String, String)> {
    let parent = match path {
        "" | "." => None,
        path => Some(path),
    };
    let child = |name: &str| match parent {
        Some(parent) => format!("{}.{}", parent, name),
        None => name.to_string(),
    };

    if let Some(name) = backticked(detail, "missing field `") {
        return Some((child(name), "Required".to_string()));
    }
    if let Some(name) = backticked(detail, "unknown field `") {
        return Some((child(name), "Unrecognized field".to_string()));
    }

    let field = parent?.to_string();
    let message = match detail.split_once(", expected ") {
        Some((_, expected)) if detail.starts_with("unknown variant") => {
            format!("Invalid enum value. Expected {}", expected)
        }
        Some((_, expected)) => format!("Expected {}", expected),
        None => "Invalid value".to_string(),
    };
    Some((field, message))
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

/// Collapses `validator` output into one message per field.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let errors = error
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first()
                    .map(|first| (field.to_string(), describe_validation_error(first)))
            })
            .collect();
        AppError::Validation { errors }
    }
}

fn describe_validation_error(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).and_then(Value::as_u64);
    match error.code.as_ref() {
        "length" => {
            let actual = error
                .params
                .get("value")
                .and_then(Value::as_str)
                .map(|value| value.chars().count() as u64);
            match (actual, param("min"), param("max")) {
                (Some(actual), Some(min), _) if actual < min => {
                    format!("Must be at least {} characters", min)
                }
                (_, _, Some(max)) => format!("Must be at most {} characters", max),
                (_, Some(min), None) => format!("Must be at least {} characters", min),
                _ => "Invalid length".to_string(),
            }
        }
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Must be between {} and {}", min, max),
            (Some(min), None) => format!("Must be at least {}", min),
            (None, Some(max)) => format!("Must be at most {}", max),
            (None, None) => "Out of range".to_string(),
        },
        "email" => "Invalid email address".to_string(),
        code => format!("Invalid value ({})", code),
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::UniqueViolation { field } => {
                let mut label = field.clone();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                AppError::Conflict {
                    message: format!(
                        "{} already exists. Please use a different {}.",
                        label, field
                    ),
                    field,
                }
            }
            StoreError::NotFound => AppError::NotFound("Record not found".into()),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Expired tokens and every other verification failure get distinct messages.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            ErrorKind::ExpiredSignature => AppError::Unauthorized(TOKEN_EXPIRED_MESSAGE.into()),
            _ => AppError::Unauthorized(TOKEN_INVALID_MESSAGE.into()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
