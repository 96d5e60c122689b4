use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::usecases::{entitlements::EntitlementError, plan_catalog::PlanCatalogError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    PlanCatalog(#[from] PlanCatalogError),

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::PlanCatalog(err) => err.status_code(),
            AppError::Entitlement(err) => err.status_code(),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = ?self, "http: request failed");
            // Don't leak internal error detail to client
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_message() {
        let err = AppError::from(PlanCatalogError::DuplicateName("Pro".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "a plan named Pro already exists");
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = AppError::from(EntitlementError::Internal(anyhow::anyhow!("pool exhausted")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
