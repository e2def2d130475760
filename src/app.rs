use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::credential_gate;

/// Shared by every handler: the connection pool and the startup configuration
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/health", get(public::health_get))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(read_routes())
        .merge(library_routes())
        .merge(collection_routes())
        .merge(journal_routes())
        .merge(follow_routes())
        .merge(recommendation_routes())
        .merge(badge_routes())
        .fallback(page_not_found)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), credential_gate))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(public::auth_register))
        .route("/api/auth/login", post(public::auth_login))
        .route("/api/auth/whoami", get(protected::auth::whoami))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/api/users", get(users::list))
        .route(
            "/api/users/:userId",
            get(users::get).patch(users::update).delete(users::delete),
        )
}

fn read_routes() -> Router<AppState> {
    use protected::reads;

    Router::new()
        .route("/api/reads", get(reads::list).post(reads::create))
        .route("/api/reads/:readId", get(reads::get))
        .route("/api/reads/:readId/reviews", get(reads::reviews))
}

fn library_routes() -> Router<AppState> {
    use protected::user_reads;

    Router::new()
        .route(
            "/api/users/:userId/reads",
            get(user_reads::list).post(user_reads::create),
        )
        .route(
            "/api/users/:userId/reads/:readId",
            get(user_reads::get)
                .patch(user_reads::update)
                .delete(user_reads::delete),
        )
}

fn collection_routes() -> Router<AppState> {
    use protected::collections;

    Router::new()
        .route(
            "/api/users/:userId/collections",
            get(collections::list).post(collections::create),
        )
        .route(
            "/api/users/:userId/collections/:collectionId",
            get(collections::get)
                .patch(collections::update)
                .delete(collections::delete),
        )
        .route(
            "/api/users/:userId/collections/:collectionId/reads",
            get(collections::reads).post(collections::add_read),
        )
        .route(
            "/api/users/:userId/collections/:collectionId/reads/:readId",
            delete(collections::remove_read),
        )
}

fn journal_routes() -> Router<AppState> {
    use protected::journals;

    Router::new()
        .route(
            "/api/users/:userId/journals",
            get(journals::list).post(journals::create),
        )
        .route(
            "/api/users/:userId/journals/:journalId",
            get(journals::get)
                .patch(journals::update)
                .delete(journals::delete),
        )
}

fn follow_routes() -> Router<AppState> {
    use protected::follows;

    Router::new()
        .route("/api/users/:userId/followers", get(follows::followers))
        .route(
            "/api/users/:userId/following",
            get(follows::following).post(follows::create),
        )
        .route(
            "/api/users/:userId/following/:followedId",
            delete(follows::delete),
        )
}

fn recommendation_routes() -> Router<AppState> {
    use protected::recommendations;

    Router::new()
        .route(
            "/api/users/:userId/recommendations",
            get(recommendations::list).post(recommendations::create),
        )
        .route(
            "/api/users/:userId/recommendations/:recommendationId",
            get(recommendations::get)
                .patch(recommendations::update)
                .delete(recommendations::delete),
        )
}

fn badge_routes() -> Router<AppState> {
    use protected::badges;

    Router::new()
        .route("/api/badges", get(badges::list))
        .route("/api/badges/:badgeId", get(badges::get))
        .route(
            "/api/users/:userId/badges",
            get(badges::earned).post(badges::award),
        )
        .route(
            "/api/users/:userId/badges/:badgeId",
            delete(badges::revoke),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn page_not_found() -> ApiError {
    ApiError::not_found("Page Not Found")
}
