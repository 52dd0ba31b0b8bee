//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error renders as a JSON body `{error, code, field?}`. The `error`
//! text is meant for shoppers; `code` is stable for clients.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mercado_core::{CartError, CheckoutError, PricingError};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Checkout attempted with no items.
    #[error("Carrinho está vazio")]
    EmptyCart,

    /// Malformed body or out-of-range input.
    #[error("{0}")]
    InvalidInput(String),

    /// A well-formed request failed field validation.
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the error body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::EmptyCart => "empty_cart",
            Self::InvalidInput(_) => "invalid_input",
            Self::Validation { .. } => "validation",
            Self::Session(_) | Self::Internal(_) => "internal",
        }
    }

    /// HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmptyCart | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Internal(_))
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let error = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let field = match &self {
            Self::Validation { field, .. } => *field,
            _ => None,
        };

        let body = ErrorBody {
            error,
            code: self.code(),
            field,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Malformed JSON body");
        Self::InvalidInput("Dados inválidos".to_string())
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::NotFound(_) => Self::NotFound("Produto não encontrado".to_string()),
            CartError::InvalidQuantity(_) => {
                Self::InvalidInput("Quantidade deve ser maior que zero".to_string())
            }
            CartError::QuantityTooLarge { .. } => {
                Self::InvalidInput("Quantidade excede o limite permitido".to_string())
            }
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidInstallments { max, .. } => Self::Validation {
                message: format!("Número de parcelas deve estar entre 1 e {max}"),
                field: Some("installments"),
            },
            PricingError::Overflow(_) => {
                Self::InvalidInput("Valor excede o limite permitido".to_string())
            }
            PricingError::InvalidPolicy(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        let field = err.field();
        match err {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::InvalidEmail(_) => Self::Validation {
                message: "E-mail inválido".to_string(),
                field,
            },
            CheckoutError::InvalidInstallments { max, .. } => Self::Validation {
                message: format!("Número de parcelas deve estar entre 1 e {max}"),
                field,
            },
            CheckoutError::Pricing(pricing) => pricing.into(),
            CheckoutError::AlreadyRun(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// JSON body extractor that rejects with an [`AppError`].
///
/// Behaves like [`axum::Json`] but malformed bodies produce the standard
/// `{error, code}` response instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}
