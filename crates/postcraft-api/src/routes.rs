use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::auth::{self, AppState};
use crate::images;
use crate::middleware::require_auth;
use crate::templates;

/// All endpoints. CORS and request tracing are layered on by the binary.
///
/// Only image upload sits behind the bearer-token gate; template writes are
/// open, as in the deployed API.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/favicon.ico", get(favicon))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/getTemplates", get(templates::list_templates))
        .route("/uploadEmailConfig", post(templates::create_template))
        .route("/updateEmailTemplate/{id}", put(templates::update_template))
        .route("/deleteEmailTemplate/{id}", delete(templates::delete_template))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/uploadImage", post(images::upload_image))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
}

async fn root() -> &'static str {
    "Server is running."
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
