//! Application error type.
//!
//! Every handler returns `Result<T, AppError>`. Data service failures are
//! logged with their details and reach the client only as a generic
//! notification.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::aggregates::{CartError, OrderError, ProductError};
use crate::notification::Notification;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input, rejected before anything is written.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Data service failure; `message` is what the user sees.
    #[error("{message}: {source}")]
    Service {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn service(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Service { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Service { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Service { message, .. } => (*message).to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        Self::Service { message: "Something went wrong. Please try again.", source }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound => Self::NotFound(err.to_string()),
            CartError::QuantityTooLarge(_) => Self::Validation(err.to_string()),
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self { Self::Validation(err.to_string()) }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NoItems => Self::Validation("No items to checkout".into()),
            OrderError::InvalidStatus(_) | OrderError::QuantityOutOfRange(_) => Self::Validation(err.to_string()),
        }
    }
}

/// Blank fields (code `required`) are reported as missing; any other rule
/// failure as an invalid value.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (mut missing, mut invalid): (Vec<&str>, Vec<&str>) = (vec![], vec![]);
        for (field, errs) in errors.field_errors() {
            if errs.iter().any(|e| e.code == "required") { missing.push(field) } else { invalid.push(field) }
        }
        missing.sort_unstable();
        invalid.sort_unstable();
        let mut parts = vec![];
        if !missing.is_empty() { parts.push(format!("Missing required fields: {}", missing.join(", "))); }
        if !invalid.is_empty() { parts.push(format!("Invalid value for: {}", invalid.join(", "))); }
        Self::Validation(parts.join(". "))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Service { message, source } = &self {
            tracing::error!(error = %source, user_message = *message, "data service error");
        }
        let status = self.status();
        let message = self.public_message();
        let body = json!({ "error": message, "notification": Notification::error(message.clone()) });
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
