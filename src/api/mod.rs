use anyhow::Context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, BootstrapOutcome, SeaOrmAuthService, ensure_admin};

mod assets;
pub mod auth;
mod error;
mod nodes;
mod observability;
mod pages;
mod subscription;
mod system;
mod types;
mod users;
mod validation;

pub use auth::AdminAccount;
pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.auth_service.as_ref()
    }
}

/// Validates the configuration, opens the store and makes sure the
/// administrator account exists. Nothing is served if any step fails.
pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    config.validate().context("Invalid configuration")?;

    let db_url = config.database.connection_url()?;
    let store = Store::with_pool_options(
        &db_url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to open database")?;

    let tokens = Arc::new(TokenIssuer::from_config(&config.auth)?);

    let outcome = ensure_admin(&store.conn, &config.admin)
        .await
        .context("Failed to bootstrap administrator account")?;
    if outcome == BootstrapOutcome::AlreadyPresent {
        tracing::debug!("Administrator '{}' already present", config.admin.username);
    }

    let auth_service: Arc<dyn AuthService> =
        Arc::new(SeaOrmAuthService::new(store.clone(), tokens));

    Ok(Arc::new(AppState {
        store,
        auth_service,
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let admin_routes = create_admin_router(state.clone());

    let mut public_routes = Router::new()
        .route("/", get(pages::index))
        .route("/login", get(pages::login_page))
        .route("/login/token", post(auth::login_for_access_token))
        .route("/sub/{uuid}", get(subscription::get_subscription))
        .route("/static/{*path}", get(assets::serve_static))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready));

    if state.prometheus_handle.is_some() {
        public_routes = public_routes.route("/metrics", get(observability::get_metrics));
    }

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/dashboard", get(pages::admin_dashboard))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{uuid}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/nodes", get(nodes::list_nodes).post(nodes::create_node))
        .route(
            "/api/nodes/{id}",
            get(nodes::get_node)
                .put(nodes::update_node)
                .delete(nodes::delete_node),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin))
}
