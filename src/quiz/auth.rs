use anyhow::anyhow;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::session::{USERNAME, USER_ID};
use crate::{AppError, AppResult};

/// Resolve the logged-in user or fail with the 401 the API contract uses.
pub(crate) async fn require_user(session: &Session) -> AppResult<i64> {
    session
        .get::<i64>(USER_ID)
        .await?
        .ok_or_else(|| AppError::unauthorized("Please login first"))
}

pub(crate) fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("password hashing failed: {err}"))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(stored: &str, password: &str) -> bool {
    PasswordHash::new(stored)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Deserialize)]
pub(crate) struct RegisterBody {
    username: String,
    email: String,
    password: String,
}

#[debug_handler]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(RegisterBody { username, email, password }): Json<RegisterBody>,
) -> AppResult<Json<Value>> {
    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(&username)
        .fetch_optional(&db_pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::bad_request("Username already exists"));
    }

    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&db_pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::bad_request("Email already exists"));
    }

    let password = hash_password(&password)?;
    let user_id = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
        .bind(&username)
        .bind(&email)
        .bind(&password)
        .execute(&db_pool)
        .await?
        .last_insert_rowid();

    session.insert(USER_ID, user_id).await?;
    session.insert(USERNAME, &username).await?;

    Ok(Json(json!({
        "message": "Registration successful",
        "user": { "id": user_id, "username": username, "email": email }
    })))
}

#[derive(Deserialize)]
pub(crate) struct LoginBody {
    username: String,
    password: String,
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(LoginBody { username, password }): Json<LoginBody>,
) -> AppResult<Json<Value>> {
    let user: Option<(i64, String, String)> =
        sqlx::query_as("SELECT id, email, password FROM users WHERE username = ?")
            .bind(&username)
            .fetch_optional(&db_pool)
            .await?;

    let Some((user_id, email, stored)) = user else {
        return Err(AppError::unauthorized("Invalid credentials"));
    };
    if !verify_password(&stored, &password) {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    session.insert(USER_ID, user_id).await?;
    session.insert(USERNAME, &username).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": { "id": user_id, "username": username, "email": email }
    })))
}

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Json<Value>> {
    session.clear().await;
    Ok(Json(json!({ "message": "Logout successful" })))
}

#[debug_handler]
pub(crate) async fn check_auth(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Value>> {
    let Some(user_id) = session.get::<i64>(USER_ID).await? else {
        return Ok(Json(json!({ "authenticated": false })));
    };

    let user: Option<(i64, String, String)> =
        sqlx::query_as("SELECT id, username, email FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&db_pool)
            .await?;
    let Some((id, username, email)) = user else {
        return Ok(Json(json!({ "authenticated": false })));
    };

    Ok(Json(json!({
        "authenticated": true,
        "user": { "id": id, "username": username, "email": email }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!verify_password("not-a-hash", "anything"));
    }

    #[tokio::test]
    async fn username_and_email_are_unique_in_the_schema() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_schema(crate::config::AppKind::Quiz, &pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO users (username, email, password) VALUES ('alice', 'a@x.y', 'h')")
            .execute(&pool)
            .await
            .unwrap();
        let same_username =
            sqlx::query("INSERT INTO users (username, email, password) VALUES ('alice', 'b@x.y', 'h')")
                .execute(&pool)
                .await;
        assert!(same_username.is_err());
        let same_email =
            sqlx::query("INSERT INTO users (username, email, password) VALUES ('bob', 'a@x.y', 'h')")
                .execute(&pool)
                .await;
        assert!(same_email.is_err());
    }
}
