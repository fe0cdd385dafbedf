use axum::http::StatusCode;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    db::{DatabaseError, InvalidDate},
    event::ApiResponse,
};

#[derive(Debug, Error)]
pub enum AppError {
    /// Client input problem; the message is shown to the caller as-is.
    #[error("{0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(message) => json!({ "error": message }),
            AppError::NotFound => json!({ "error": "not found" }),
            other => json!({
                "error": "internal error",
                "details": other.to_string(),
            }),
        };
        ApiResponse::json(status, &body)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        // field_errors() is a HashMap; keep the message stable.
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<InvalidDate> for AppError {
    fn from(err: InvalidDate) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
