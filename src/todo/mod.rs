mod tasks;

use axum::{debug_handler, response::Html, routing::get, Router};

use crate::{include_res, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::add_task))
        .route("/api/tasks/{id}", axum::routing::put(tasks::update_task).delete(tasks::delete_task))
        .route("/api/tasks/{id}/toggle", axum::routing::put(tasks::toggle_task))
}

#[debug_handler]
async fn index() -> Html<&'static str> {
    Html(include_res!(str, "/pages/todo/index.html"))
}
