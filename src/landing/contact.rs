use axum::{debug_handler, extract::State, response::Html, Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{include_res, AppResult};

#[derive(Deserialize)]
pub(crate) struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

#[debug_handler]
pub(crate) async fn contact_page() -> Html<&'static str> {
    Html(include_res!(str, "/pages/landing/contact.html"))
}

#[debug_handler]
pub(crate) async fn submit_contact(
    State(db_pool): State<SqlitePool>,
    Form(ContactForm { name, email, message }): Form<ContactForm>,
) -> AppResult<Json<Value>> {
    let (Some(name), Some(email), Some(message)) = (
        name.filter(|s| !s.is_empty()),
        email.filter(|s| !s.is_empty()),
        message.filter(|s| !s.is_empty()),
    ) else {
        return Ok(Json(json!({
            "success": false,
            "message": "All fields are required!"
        })));
    };

    sqlx::query("INSERT INTO contacts (name, email, message) VALUES (?, ?, ?)")
        .bind(&name)
        .bind(&email)
        .bind(&message)
        .execute(&db_pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully!"
    })))
}

#[debug_handler]
pub(crate) async fn admin_contacts(
    State(db_pool): State<SqlitePool>,
) -> AppResult<Html<String>> {
    let contacts: Vec<(i64, String, String, String, String)> = sqlx::query_as(
        "SELECT id, name, email, message, created_at FROM contacts ORDER BY created_at DESC",
    )
    .fetch_all(&db_pool)
    .await?;

    let mut contact_rows = String::new();
    for (id, name, email, message, created_at) in contacts {
        contact_rows += &include_res!(str, "/pages/landing/contact_row.html")
            .replace("{id}", &id.to_string())
            .replace("{name}", &escape(&name))
            .replace("{email}", &escape(&email))
            .replace("{message}", &escape(&message))
            .replace("{created_at}", &created_at);
    }

    Ok(Html(
        include_res!(str, "/pages/landing/admin_contacts.html")
            .replace("{contact_rows}", &contact_rows),
    ))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
