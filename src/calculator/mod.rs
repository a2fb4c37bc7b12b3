mod calculate;
mod convert;
pub mod eval;
mod history;

use axum::{debug_handler, response::Html, routing::{get, post}, Router};

use crate::{include_res, AppState};

pub use convert::convert;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/calculate", post(calculate::calculate))
        .route("/convert", post(convert::convert_units))
        .route("/history", get(history::history))
        .route("/conversion-history", get(history::conversion_history))
        .route("/clear-history", post(history::clear_history))
        .route("/statistics", get(history::statistics))
}

#[debug_handler]
async fn index() -> Html<&'static str> {
    Html(include_res!(str, "/pages/calculator/index.html"))
}
