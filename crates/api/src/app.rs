use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use domain::services::{Coordinator, InvitationGateway};
use shared::jwt::{JwtConfig, JwtError};
use shared::seating_token::{SeatingTokenCodec, TokenError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_user_auth, trace_id};
use crate::routes::{auth, events, health, invitees};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub coordinator: Arc<Coordinator>,
    pub jwt: Arc<JwtConfig>,
}

/// Failure to build the application from its configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid seating token key: {0}")]
    SeatingKey(#[from] TokenError),

    #[error("Invalid JWT configuration: {0}")]
    Jwt(#[from] JwtError),
}

impl AppState {
    /// Builds the codec, JWT signer and coordinator once for the process.
    pub fn new(
        config: Config,
        pool: PgPool,
        gateway: Arc<dyn InvitationGateway>,
    ) -> Result<Self, StartupError> {
        let codec = SeatingTokenCodec::new(config.seating.token_key.as_bytes())?;
        let jwt = JwtConfig::with_leeway(
            &config.jwt.secret,
            config.jwt.token_expiry_secs,
            config.jwt.leeway_secs,
        )?;
        let coordinator = Coordinator::new(gateway, codec, config.seating.self_reference_policy);

        Ok(Self {
            pool,
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
            jwt: Arc::new(jwt),
        })
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn create_app(
    config: Config,
    pool: PgPool,
    gateway: Arc<dyn InvitationGateway>,
) -> Result<Router, StartupError> {
    let state = AppState::new(config, pool, gateway)?;
    let config = state.config.clone();

    // Organizer-only paths. Paths shared with public methods authenticate in
    // the handler through the AuthUser extractor instead.
    let protected_routes = Router::new()
        .route(
            "/api/v1/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/v1/events/:event_id/stats", get(events::get_event_stats))
        .route(
            "/api/v1/events/:event_id/relationships/invitees",
            get(events::list_invitees).post(events::create_invitee),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route(
            "/api/v1/token",
            post(auth::login).get(auth::refresh).delete(auth::logout),
        )
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route(
            "/api/v1/events/:event_id/relationships/menu_items",
            get(events::get_menu_items).post(events::create_menu_item),
        )
        .route(
            "/api/v1/events/:event_id/relationships/seating_request_choices",
            get(events::get_seating_request_choices),
        )
        .route(
            "/api/v1/invitees/:invitee_id",
            get(invitees::get_invitee).patch(invitees::edit_invitee),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/friends",
            post(invitees::create_friend),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/friends/:friend_id",
            patch(invitees::edit_friend),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/menu_choices",
            post(invitees::set_menu_choices),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/menu_note",
            post(invitees::set_menu_note),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/seating_requests",
            post(invitees::set_seating_requests),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/friends/:friend_id/relationships/menu_choices",
            post(invitees::set_friend_menu_choices),
        )
        .route(
            "/api/v1/invitees/:invitee_id/relationships/friends/:friend_id/relationships/menu_note",
            post(invitees::set_friend_menu_note),
        );

    let operational_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let router = Router::new()
        .merge(operational_routes)
        .merge(public_routes)
        .merge(protected_routes)
        // Bottom layers run first
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state);

    Ok(router)
}
