pub mod chat;

use crate::config::Config;
use crate::middleware::logging;
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::convert::Infallible;
use std::sync::Arc;
use tower::{Service, ServiceExt};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router around the injected asset collaborator.
///
/// The classification is single-step: POST `/api/chat` is the chat handler,
/// other methods there are 405, every other `/api/`-prefixed path is 404,
/// and everything else passes through to `assets` untouched.
pub fn build_router<S>(state: Arc<AppState>, assets: S) -> Router
where
    S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
{
    let cors = build_cors_layer(&state.config);

    Router::new()
        .route(
            "/api/chat",
            post(chat::chat_completion).fallback(method_not_allowed),
        )
        .fallback(move |req: Request| route_unmatched(assets.clone(), req))
        .layer(axum::middleware::from_fn(logging::log_request))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Requests no route claimed: unknown API paths are 404, anything outside
/// `/api/` belongs to the asset collaborator.
async fn route_unmatched<S>(assets: S, req: Request) -> Response
where
    S: Service<Request, Error = Infallible>,
    S::Response: IntoResponse,
{
    if req.uri().path().starts_with("/api/") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    match assets.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    }
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(
                config
                    .cors
                    .origins
                    .iter()
                    .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
            ))
        }
    } else {
        CorsLayer::permissive()
    }
}
