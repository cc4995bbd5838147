use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use flakeid::{
    LockSnowflakeGenerator, SnowflakeGeneratorAsyncExt, SnowflakeId, TimeSource, TokioSleep,
    TokioYield,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::server::{config::WaitMode, error::ApiError};

/// Shared request state. Cloning shares the generator's state.
pub struct AppState<T>
where
    T: TimeSource,
{
    pub generator: LockSnowflakeGenerator<T>,
    pub wait_mode: WaitMode,
}

impl<T> Clone for AppState<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            wait_mode: self.wait_mode,
        }
    }
}

impl<T> AppState<T>
where
    T: TimeSource,
{
    pub const fn new(generator: LockSnowflakeGenerator<T>, wait_mode: WaitMode) -> Self {
        Self {
            generator,
            wait_mode,
        }
    }
}

impl<T> AppState<T>
where
    T: TimeSource + Clone + Send + Sync + 'static,
{
    async fn next_id(&self) -> Result<SnowflakeId, ApiError> {
        let id = match self.wait_mode {
            // The blocking wait holds the generator lock, so keep it off the
            // runtime's worker threads.
            WaitMode::Spin => {
                let generator = self.generator.clone();
                tokio::task::spawn_blocking(move || generator.generate_id()).await??
            }
            WaitMode::Yield => self.generator.generate_id_async::<TokioYield>().await?,
            WaitMode::Sleep => self.generator.generate_id_async::<TokioSleep>().await?,
        };
        Ok(id)
    }
}

#[derive(Debug, Serialize)]
pub struct TimeResponse {
    pub time: SnowflakeId,
}

pub async fn get_time<T>(State(state): State<AppState<T>>) -> Result<Json<TimeResponse>, ApiError>
where
    T: TimeSource + Clone + Send + Sync + 'static,
{
    let id = state.next_id().await?;
    Ok(Json(TimeResponse { time: id }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Builds the HTTP surface: `GET /getTime` and `GET /health`, reachable from
/// any origin.
pub fn router<T>(state: AppState<T>) -> Router
where
    T: TimeSource + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/getTime", get(get_time::<T>))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
