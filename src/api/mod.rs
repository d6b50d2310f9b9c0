use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod activity;
pub mod auth;
pub mod directory;
mod error;
mod observability;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

use crate::services::{ActivityService, CredentialService, ResetService, SessionService};

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<dyn crate::clients::directory::StudentDirectory> {
        &self.shared.directory
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityService {
        &self.shared.activity
    }

    #[must_use]
    pub fn credential_service(&self) -> &Arc<dyn CredentialService> {
        &self.shared.credential_service
    }

    #[must_use]
    pub fn session_service(&self) -> &Arc<dyn SessionService> {
        &self.shared.session_service
    }

    #[must_use]
    pub fn reset_service(&self) -> &Arc<dyn ResetService> {
        &self.shared.reset_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/enrollment/students", get(directory::list_students))
        .route(
            "/enrollment/students/{student_id}",
            get(directory::get_student),
        )
        .route("/auth/password/generate", post(auth::generate_password))
        .route(
            "/auth/password/status/{student_id}",
            get(auth::password_status),
        )
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", delete(auth::logout))
        .route("/auth/password/reset-request", post(auth::reset_request))
        .route("/auth/password/reset", put(auth::reset_password))
        .route("/auth/login-activity/log", post(activity::log_activity))
        .route("/auth/login-activity", get(activity::all_activity))
        .route(
            "/auth/login-activity/{student_id}",
            get(activity::student_activity),
        )
        .route("/health", get(observability::get_health))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    api_router
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login/status", get(auth::login_status))
        .route("/auth/password/change", put(auth::change_password))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::session_middleware,
        ))
}
