use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use bidbuilder_shared::error::TokenError;
use bidbuilder_shared::SharedError;
use bidbuilder_store::StoreError;
use bidbuilder_summarizer::SummarizeError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Map a store lookup failure to `NotFound("<what> not found")`, passing
/// every other store error through the usual conversion.
pub fn missing(what: &'static str) -> impl FnOnce(StoreError) -> ServerError {
    move |err| match err {
        StoreError::NotFound => ServerError::NotFound(format!("{what} not found")),
        other => other.into(),
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServerError::NotFound("Record not found".into()),
            StoreError::Conflict(msg) => ServerError::Conflict(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for ServerError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) | TokenError::UnsupportedAlgorithm(_) => {
                ServerError::Internal(err.to_string())
            }
            other => ServerError::Unauthorized(other.to_string()),
        }
    }
}

impl From<SharedError> for ServerError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::Token(token) => token.into(),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<SummarizeError> for ServerError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::Unavailable(_) | SummarizeError::RequestFailed(_) => {
                ServerError::ServiceUnavailable(err.to_string())
            }
            SummarizeError::Document(_) | SummarizeError::EmptyDocument => {
                ServerError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = axum::Json(serde_json::json!({
            "detail": message,
        }));

        if matches!(self, ServerError::Unauthorized(_)) {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_taxonomy() {
        assert_eq!(
            ServerError::from(StoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(StoreError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(StoreError::Migration("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_names_the_entity() {
        let err = missing("Template")(StoreError::NotFound);
        assert_eq!(err.to_string(), "Template not found");
    }

    #[test]
    fn token_failures_are_unauthorized() {
        let err: ServerError = TokenError::Expired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let resp = err.into_response();
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn generator_outage_is_service_unavailable() {
        let err: ServerError = SummarizeError::Unavailable("down".into()).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
