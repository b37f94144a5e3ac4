use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::rest::dto::ErrorBody;
use crate::domain::error::DomainError;

pub const NOT_FOUND_MESSAGE: &str = "Gasto no encontrado";
pub const INTERNAL_MESSAGE: &str = "Error interno del servidor";

/// Error response rendered as `{"error": "<message>"}`
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Map domain error to an HTTP error. Storage details stay in the logs.
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::ExpenseNotFound { .. } => {
            ApiError::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
        }
        DomainError::MissingFields => ApiError::bad_request(e.to_string()),
        DomainError::Validation { field, message } => {
            ApiError::bad_request(format!("{}: {}", field, message))
        }
        DomainError::Storage { .. } => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
        }
    }
}

/// Gives bodiless error responses produced outside the handlers (timeouts,
/// unmatched methods) the `{"error": ...}` shape.
pub async fn json_error_fallback(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();
    if !(status.is_client_error() || status.is_server_error())
        || res.headers().contains_key(header::CONTENT_TYPE)
    {
        return res;
    }

    let message = status.canonical_reason().unwrap_or("Error");
    let (parts, _) = res.into_parts();
    let mut mapped = ApiError::new(status, message).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_LENGTH {
            mapped.headers_mut().entry(name).or_insert_with(|| value.clone());
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware::from_fn, routing::get, Router};
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn timeout_renders_json_error() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_millis(20),
            ))
            .layer(from_fn(json_error_fallback));

        let res = router
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"error": "Request Timeout"})
        );
    }

    #[tokio::test]
    async fn handler_errors_pass_through_untouched() {
        let router = Router::new()
            .route(
                "/missing",
                get(|| async { ApiError::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE) }),
            )
            .route("/ok", get(|| async { StatusCode::NO_CONTENT }))
            .layer(from_fn(json_error_fallback));

        let res = router
            .clone()
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"error": "Gasto no encontrado"})
        );

        let res = router
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
    use crate::domain::error::REQUIRED_FIELDS_MESSAGE;

    #[test]
    fn statuses_and_messages() {
        let nf = map_domain_error(&DomainError::expense_not_found("juan", "x"));
        assert_eq!(nf.status(), StatusCode::NOT_FOUND);
        assert_eq!(nf.message(), "Gasto no encontrado");

        let missing = map_domain_error(&DomainError::missing_fields());
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.message(), REQUIRED_FIELDS_MESSAGE);

        let invalid = map_domain_error(&DomainError::validation("amount", "must be >= 0"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), "amount: must be >= 0");

        let storage = map_domain_error(&DomainError::storage(anyhow::anyhow!(
            "disk full at /var/data/gastos.json"
        )));
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!storage.message().contains("/var/data"));
    }
}
