use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::cart::CartError;
use crate::application::usecases::checkout::CheckoutError;
use crate::application::usecases::login::LoginError;
use crate::application::usecases::token_auth::AuthError;

/// Wire shape of every failure. `code` is the stable business code, not the
/// HTTP status:
///
/// | code | failure                 |
/// |------|-------------------------|
/// | 1001 | course not found        |
/// | 1003 | bad credentials         |
/// | 1010 | price policy not found  |
/// | 1021 | missing token           |
/// | 1022 | invalid token           |
/// | 1023 | expired token           |
/// | 1044 | cart item not found     |
/// | 1500 | transient store failure |
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

fn render(status: StatusCode, code: u16, message: String) -> Response {
    (status, Json(ErrorResponse { code, message })).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Don't leak internal error detail to the client.
            AuthError::Transient(_) => "temporary storage failure".to_string(),
            other => other.to_string(),
        };
        render(self.status_code(), self.business_code(), message)
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let message = match &self {
            CartError::Transient(_) => "temporary storage failure".to_string(),
            other => other.to_string(),
        };
        render(self.status_code(), self.business_code(), message)
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let message = match &self {
            CheckoutError::Transient(_) => "temporary storage failure".to_string(),
            other => other.to_string(),
        };
        render(self.status_code(), self.business_code(), message)
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let message = match &self {
            LoginError::Transient(_) => "temporary storage failure".to_string(),
            other => other.to_string(),
        };
        render(self.status_code(), self.business_code(), message)
    }
}
