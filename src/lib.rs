pub mod appresult;
pub mod calculator;
pub mod config;
pub mod db;
pub mod landing;
pub mod quiz;
pub mod res;
pub mod session;
pub mod todo;

use axum::extract::FromRef;
use sqlx::SqlitePool;

pub use appresult::{AppError, AppResult};
pub use config::{AppKind, Config};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}
