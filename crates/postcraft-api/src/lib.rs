pub mod auth;
pub mod error;
pub mod images;
pub mod middleware;
pub mod routes;
pub mod templates;

use postcraft_db::Database;

use crate::auth::AppState;
use crate::error::ApiError;

/// Run blocking database work off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let value = tokio::task::spawn_blocking(move || f(&state.db)).await??;
    Ok(value)
}
