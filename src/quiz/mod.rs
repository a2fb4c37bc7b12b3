mod attempts;
mod auth;
mod questions;
pub mod seed;

use axum::{debug_handler, response::Html, routing::{get, post}, Router};

use crate::{include_res, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/subjects", get(questions::subjects))
        .route("/api/questions/{subject_id}", get(questions::questions))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/check-auth", get(auth::check_auth))
        .route("/api/submit-quiz", post(attempts::submit_quiz))
        .route("/api/leaderboard", get(attempts::leaderboard))
        .route("/api/user-stats", get(attempts::user_stats))
}

#[debug_handler]
async fn index() -> Html<&'static str> {
    Html(include_res!(str, "/pages/quiz/index.html"))
}
