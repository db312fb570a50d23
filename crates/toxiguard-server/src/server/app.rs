use crate::server::routes;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS policy for the configured origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the Axum application
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let admin_routes = Router::new()
        .route("/login", post(routes::admin_login))
        .route("/logout", post(routes::admin_logout))
        .route("/overview", get(routes::overview))
        .route("/recent", get(routes::recent))
        .route("/toxic", get(routes::toxic))
        .route("/users", get(routes::users))
        .route("/terms", get(routes::terms))
        .route("/comments", get(routes::query_comments))
        .route("/export", get(routes::export));

    let api_routes = Router::new()
        // Submission
        .route(
            "/comments",
            get(routes::list_feed).post(routes::submit_comment),
        )
        // Pending drafts
        .route(
            "/drafts/:id",
            get(routes::get_draft).delete(routes::cancel_draft),
        )
        .route("/drafts/:id/edit", post(routes::edit_draft))
        .route("/drafts/:id/accept", post(routes::accept_draft))
        // Moderation
        .nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::metrics))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Run the server until `shutdown` resolves
pub async fn run_server(
    state: AppState,
    cors_origins: &[String],
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_app(state, cors_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Toxiguard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
