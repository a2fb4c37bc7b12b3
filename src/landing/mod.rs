mod contact;
mod newsletter;

use axum::{debug_handler, response::Html, routing::{get, post}, Router};

use crate::{include_res, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/services", get(services))
        .route("/contact", get(contact::contact_page).post(contact::submit_contact))
        .route("/api/newsletter", post(newsletter::subscribe))
        .route("/admin/contacts", get(contact::admin_contacts))
}

#[debug_handler]
async fn index() -> Html<&'static str> {
    Html(include_res!(str, "/pages/landing/index.html"))
}

#[debug_handler]
async fn about() -> Html<&'static str> {
    Html(include_res!(str, "/pages/landing/about.html"))
}

#[debug_handler]
async fn services() -> Html<&'static str> {
    Html(include_res!(str, "/pages/landing/services.html"))
}
