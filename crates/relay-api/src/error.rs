//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; any `AppError`
//! converts with `?` and renders as an `ErrorResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether redelivering the same event may succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Required by the orphan rule: both IntoResponse and AppError are foreign here.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl HttpAppError {
    fn to_error_response(&self, include_details: bool) -> ErrorResponse {
        let app_error = &self.0;
        ErrorResponse {
            error: app_error.client_message(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let include_details = !is_production_env() && !app_error.is_sensitive();
        let body = self.to_error_response(include_details);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::AccountRole;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::MalformedEvent("x".to_string()), StatusCode::BAD_REQUEST),
            (
                AppError::CredentialNotFound {
                    account_id: "acct1".to_string(),
                    role: AccountRole::Source,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Transfer {
                    key: "file.txt".to_string(),
                    message: "reset".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpAppError(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_sensitive_error_hides_details() {
        let err = HttpAppError(AppError::ClientConstruction(
            "key for acct1 is not valid base64".to_string(),
        ));
        let body = err.to_error_response(!err.0.is_sensitive());
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(body.code, "CLIENT_CONSTRUCTION_ERROR");
        assert!(!body.error.contains("base64"));
    }

    #[test]
    fn test_error_response_shape() {
        let err = HttpAppError(AppError::MalformedEvent("missing data.url".to_string()));
        let json = serde_json::to_value(err.to_error_response(true)).unwrap();

        assert_eq!(json["code"], "MALFORMED_EVENT");
        assert_eq!(json["recoverable"], false);
        assert_eq!(json["error_type"], "MalformedEvent");
        assert!(json["details"].as_str().unwrap().contains("missing data.url"));
        assert!(json["suggested_action"].is_string());
    }
}
