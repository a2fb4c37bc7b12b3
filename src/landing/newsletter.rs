use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::AppResult;

#[derive(Deserialize)]
pub(crate) struct SubscribeBody {
    email: Option<String>,
}

#[debug_handler]
pub(crate) async fn subscribe(
    State(db_pool): State<SqlitePool>,
    Json(SubscribeBody { email }): Json<SubscribeBody>,
) -> AppResult<Json<Value>> {
    let Some(email) = email.filter(|e| !e.is_empty()) else {
        return Ok(Json(json!({
            "success": false,
            "message": "Email is required!"
        })));
    };

    match sqlx::query("INSERT INTO newsletter (email) VALUES (?)")
        .bind(&email)
        .execute(&db_pool)
        .await
    {
        Ok(_) => Ok(Json(json!({
            "success": true,
            "message": "Subscribed successfully!"
        }))),
        Err(err) if is_unique_violation(&err) => Ok(Json(json!({
            "success": false,
            "message": "Email already subscribed!"
        }))),
        Err(err) => Err(err.into()),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::config::AppKind;
    use crate::db;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(AppKind::Landing, &pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn duplicate_subscription_keeps_a_single_row() {
        let pool = test_pool().await;

        let first = sqlx::query("INSERT INTO newsletter (email) VALUES (?)")
            .bind("reader@example.com")
            .execute(&pool)
            .await;
        assert!(first.is_ok());

        let second = sqlx::query("INSERT INTO newsletter (email) VALUES (?)")
            .bind("reader@example.com")
            .execute(&pool)
            .await;
        assert!(matches!(&second, Err(err) if super::is_unique_violation(err)));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM newsletter")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
