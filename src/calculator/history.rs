use axum::{debug_handler, extract::{Query, State}, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::SqlitePool;

use crate::AppResult;

#[derive(Deserialize)]
pub(crate) struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Serialize, sqlx::FromRow)]
struct CalculationRow {
    expression: String,
    result: String,
    mode: String,
    timestamp: String,
}

#[derive(Serialize, sqlx::FromRow)]
struct ConversionRow {
    #[serde(rename = "type")]
    conversion_type: String,
    from_value: f64,
    from_unit: String,
    to_value: f64,
    to_unit: String,
    timestamp: String,
}

#[debug_handler]
pub(crate) async fn history(
    State(db_pool): State<SqlitePool>,
    Query(HistoryQuery { limit }): Query<HistoryQuery>,
) -> AppResult<Json<Value>> {
    let rows: Vec<CalculationRow> = sqlx::query_as(
        "SELECT expression, result, mode, timestamp FROM calculations ORDER BY id DESC LIMIT ?",
    )
    .bind(limit.unwrap_or(20))
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(json!({ "history": rows })))
}

#[debug_handler]
pub(crate) async fn conversion_history(
    State(db_pool): State<SqlitePool>,
    Query(HistoryQuery { limit }): Query<HistoryQuery>,
) -> AppResult<Json<Value>> {
    let rows: Vec<ConversionRow> = sqlx::query_as(
        "SELECT conversion_type, from_value, from_unit, to_value, to_unit, timestamp
         FROM conversions ORDER BY id DESC LIMIT ?",
    )
    .bind(limit.unwrap_or(20))
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(json!({ "history": rows })))
}

#[derive(Deserialize)]
pub(crate) struct ClearHistoryBody {
    #[serde(rename = "type")]
    history_type: Option<String>,
}

#[debug_handler]
pub(crate) async fn clear_history(
    State(db_pool): State<SqlitePool>,
    Json(ClearHistoryBody { history_type }): Json<ClearHistoryBody>,
) -> AppResult<Json<Value>> {
    match history_type.as_deref() {
        Some("calculations") => {
            sqlx::query("DELETE FROM calculations").execute(&db_pool).await?;
        }
        Some("conversions") => {
            sqlx::query("DELETE FROM conversions").execute(&db_pool).await?;
        }
        _ => {
            sqlx::query("DELETE FROM calculations").execute(&db_pool).await?;
            sqlx::query("DELETE FROM conversions").execute(&db_pool).await?;
        }
    }

    Ok(Json(json!({ "message": "History cleared" })))
}

#[debug_handler]
pub(crate) async fn statistics(State(db_pool): State<SqlitePool>) -> AppResult<Json<Value>> {
    let (total_calculations,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM calculations")
        .fetch_one(&db_pool)
        .await?;
    let (total_conversions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversions")
        .fetch_one(&db_pool)
        .await?;

    let modes: Vec<(String, i64)> =
        sqlx::query_as("SELECT mode, COUNT(*) FROM calculations GROUP BY mode")
            .fetch_all(&db_pool)
            .await?;
    let mut mode_statistics = Map::new();
    for (mode, count) in modes {
        mode_statistics.insert(mode, count.into());
    }

    Ok(Json(json!({
        "total_calculations": total_calculations,
        "total_conversions": total_conversions,
        "mode_statistics": mode_statistics,
    })))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
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
        db::init_schema(AppKind::Calculator, &pool).await.unwrap();
        pool
    }

    async fn log_calculation(pool: &SqlitePool, expression: &str, result: &str, mode: &str) {
        sqlx::query("INSERT INTO calculations (expression, result, mode) VALUES (?, ?, ?)")
            .bind(expression)
            .bind(result)
            .bind(mode)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn history_is_newest_first_and_honors_limit() {
        let pool = test_pool().await;
        for i in 0..5 {
            log_calculation(&pool, &format!("{i}+{i}"), &format!("{}", i * 2), "basic").await;
        }

        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT expression FROM calculations ORDER BY id DESC LIMIT ?")
                .bind(2_i64)
                .fetch_all(&pool)
                .await
                .unwrap();
        let expressions: Vec<&str> = rows.iter().map(|(e,)| e.as_str()).collect();
        assert_eq!(expressions, vec!["4+4", "3+3"]);
    }

    #[tokio::test]
    async fn mode_counts_group_by_mode() {
        let pool = test_pool().await;
        log_calculation(&pool, "1+1", "2", "basic").await;
        log_calculation(&pool, "2+2", "4", "basic").await;
        log_calculation(&pool, "sin(30)", "0.5", "scientific").await;

        let modes: Vec<(String, i64)> =
            sqlx::query_as("SELECT mode, COUNT(*) FROM calculations GROUP BY mode")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(modes, vec![("basic".to_owned(), 2), ("scientific".to_owned(), 1)]);
    }
}
