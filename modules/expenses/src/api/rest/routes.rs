use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::from_fn,
    routing::get,
    Extension, Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::api::rest::{error::json_error_fallback, handlers, request_id};
use crate::domain::service::Service;

/// HTTP stack settings for [`build_router`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// `None` disables the handler timeout
    pub timeout: Option<Duration>,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            cors_enabled: true,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// Register the expense routes on `router`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // GET /api/{owner} - list; POST /api/{owner} - create
        .route(
            "/api/{owner}",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        // GET/PUT/DELETE /api/{owner}/{id}
        .route(
            "/api/{owner}/{id}",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route("/health", get(handlers::health_check))
        .layer(Extension(service))
}

/// Full application router with the middleware stack.
pub fn build_router(service: Arc<Service>, options: &RouterOptions) -> Router {
    let mut router = register_routes(Router::new(), service);

    // Layers wrap what is already there, so they are added innermost first.
    // Outermost to innermost:
    // SetRequestId -> PropagateRequestId -> Trace -> json_error_fallback -> Timeout -> CORS -> body limit
    // The body limit is enforced by the extractors, so oversized bodies reach
    // the handlers as a `JsonRejection`.
    let x_request_id = request_id::header();

    router = router.layer(DefaultBodyLimit::max(options.body_limit_bytes));

    if options.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    if let Some(timeout) = options.timeout {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));
    }

    router = router.layer(from_fn(json_error_fallback));
    router = router.layer(request_id::create_trace_layer());
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
}
