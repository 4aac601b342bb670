use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod auth;
mod demo;
mod error;
mod roles;
mod types;
mod users;

pub use error::{ApiError, ErrorEnvelope};
pub use types::*;

pub fn router(state: Arc<SharedState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = Router::new()
        .route("/user/add", post(users::create_user))
        .route("/user/info/{id}", get(users::get_user))
        .route("/user/all", get(users::list_users))
        .route("/user/update/{id}", put(users::update_user))
        .route("/user/del/{id}", delete(users::delete_user))
        .route("/role/add", post(roles::create_role))
        .route("/role/all", get(roles::list_roles))
        .route("/demo/add", post(demo::add_vector))
        .route("/demo/ask", post(demo::ask))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/v1", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
