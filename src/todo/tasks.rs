use axum::{debug_handler, extract::{Path, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{AppError, AppResult};

#[derive(Debug, Serialize, sqlx::FromRow)]
pub(crate) struct Task {
    id: i64,
    title: String,
    description: Option<String>,
    due_date: Option<String>,
    due_time: Option<String>,
    priority: i64,
    completed: i64,
    created_at: String,
}

const TASK_COLUMNS: &str =
    "id, title, description, due_date, due_time, priority, completed, created_at";

// Incomplete tasks first, then by priority, then by due date. Due dates
// compare as text; the bundled page submits zero-padded ISO dates so the
// ordering is calendar-correct.
#[debug_handler]
pub(crate) async fn list_tasks(State(db_pool): State<SqlitePool>) -> AppResult<Json<Vec<Task>>> {
    let tasks: Vec<Task> = sqlx::query_as(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY completed ASC, priority ASC, due_date ASC"
    ))
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(tasks))
}

fn default_priority() -> i64 {
    4
}

#[derive(Deserialize)]
pub(crate) struct CreateTaskBody {
    title: String,
    description: Option<String>,
    due_date: Option<String>,
    due_time: Option<String>,
    #[serde(default = "default_priority")]
    priority: i64,
}

#[debug_handler]
pub(crate) async fn add_task(
    State(db_pool): State<SqlitePool>,
    Json(CreateTaskBody { title, description, due_date, due_time, priority }): Json<CreateTaskBody>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task_id = sqlx::query(
        "INSERT INTO tasks (title, description, due_date, due_time, priority)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&title)
    .bind(&description)
    .bind(&due_date)
    .bind(&due_time)
    .bind(priority)
    .execute(&db_pool)
    .await?
    .last_insert_rowid();

    let task: Task = sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(task_id)
        .fetch_one(&db_pool)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Deserialize)]
pub(crate) struct UpdateTaskBody {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<String>,
    due_time: Option<String>,
}

#[debug_handler]
pub(crate) async fn update_task(
    State(db_pool): State<SqlitePool>,
    Path(task_id): Path<i64>,
    Json(UpdateTaskBody { title, description, due_date, due_time }): Json<UpdateTaskBody>,
) -> AppResult<Json<Task>> {
    sqlx::query("UPDATE tasks SET title = ?, description = ?, due_date = ?, due_time = ? WHERE id = ?")
        .bind(&title)
        .bind(&description)
        .bind(&due_date)
        .bind(&due_time)
        .bind(task_id)
        .execute(&db_pool)
        .await?;

    let task: Option<Task> = sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(task_id)
        .fetch_optional(&db_pool)
        .await?;

    task.map(Json).ok_or_else(|| AppError::not_found("Task not found"))
}

#[debug_handler]
pub(crate) async fn toggle_task(
    State(db_pool): State<SqlitePool>,
    Path(task_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let completed: Option<(i64,)> = sqlx::query_as("SELECT completed FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_optional(&db_pool)
        .await?;
    let Some((completed,)) = completed else {
        return Err(AppError::not_found("Task not found"));
    };

    let new_status = if completed == 0 { 1 } else { 0 };
    sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
        .bind(new_status)
        .bind(task_id)
        .execute(&db_pool)
        .await?;

    Ok(Json(json!({ "completed": new_status })))
}

#[debug_handler]
pub(crate) async fn delete_task(
    State(db_pool): State<SqlitePool>,
    Path(task_id): Path<i64>,
) -> AppResult<Json<Value>> {
    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(&db_pool)
        .await?;

    Ok(Json(json!({ "message": "Task deleted" })))
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
        db::init_schema(AppKind::Todo, &pool).await.unwrap();
        pool
    }

    async fn insert_task(pool: &SqlitePool, title: &str, completed: i64, priority: i64, due_date: &str) {
        sqlx::query("INSERT INTO tasks (title, completed, priority, due_date) VALUES (?, ?, ?, ?)")
            .bind(title)
            .bind(completed)
            .bind(priority)
            .bind(due_date)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn display_order_puts_incomplete_high_priority_first() {
        let pool = test_pool().await;
        insert_task(&pool, "done early", 1, 1, "2024-01-01").await;
        insert_task(&pool, "later priority", 0, 2, "2024-01-01").await;
        insert_task(&pool, "urgent", 0, 1, "2024-02-01").await;

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT title FROM tasks ORDER BY completed ASC, priority ASC, due_date ASC",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let titles: Vec<&str> = rows.iter().map(|(title,)| title.as_str()).collect();
        assert_eq!(titles, vec!["urgent", "later priority", "done early"]);
    }

    #[tokio::test]
    async fn same_priority_orders_by_due_date() {
        let pool = test_pool().await;
        insert_task(&pool, "second", 0, 1, "2024-02-01").await;
        insert_task(&pool, "first", 0, 1, "2024-01-15").await;

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT title FROM tasks ORDER BY completed ASC, priority ASC, due_date ASC",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(rows[0].0, "first");
        assert_eq!(rows[1].0, "second");
    }

    #[tokio::test]
    async fn toggle_flips_between_zero_and_one() {
        let pool = test_pool().await;
        insert_task(&pool, "flip me", 0, 4, "2024-01-01").await;

        for expected in [1, 0] {
            let (completed,): (i64,) = sqlx::query_as("SELECT completed FROM tasks WHERE id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
            let new_status = if completed == 0 { 1 } else { 0 };
            sqlx::query("UPDATE tasks SET completed = ? WHERE id = 1")
                .bind(new_status)
                .execute(&pool)
                .await
                .unwrap();
            assert_eq!(new_status, expected);
        }
    }

    #[tokio::test]
    async fn priority_defaults_to_lowest() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO tasks (title) VALUES ('bare')")
            .execute(&pool)
            .await
            .unwrap();

        let (priority, completed): (i64, i64) =
            sqlx::query_as("SELECT priority, completed FROM tasks WHERE title = 'bare'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((priority, completed), (4, 0));
    }
}
