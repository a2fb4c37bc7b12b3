use axum::{debug_handler, extract::{Path, State}, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::AppResult;

use super::auth;

#[debug_handler]
pub(crate) async fn subjects(State(db_pool): State<SqlitePool>) -> AppResult<Json<Value>> {
    let rows: Vec<(i64, String, String, String, i64)> = sqlx::query_as(
        "SELECT s.id, s.name, s.icon, s.description, COUNT(q.id)
         FROM subjects s LEFT JOIN questions q ON q.subject_id = s.id
         GROUP BY s.id ORDER BY s.id",
    )
    .fetch_all(&db_pool)
    .await?;

    let subjects: Vec<Value> = rows
        .into_iter()
        .map(|(id, name, icon, description, question_count)| {
            json!({
                "id": id,
                "name": name,
                "icon": icon,
                "description": description,
                "question_count": question_count,
            })
        })
        .collect();

    Ok(Json(Value::Array(subjects)))
}

#[debug_handler]
pub(crate) async fn questions(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Path(subject_id): Path<i64>,
) -> AppResult<Json<Value>> {
    auth::require_user(&session).await?;

    type QuestionRow = (i64, String, String, String, String, String, i64, String, Option<String>);
    let rows: Vec<QuestionRow> = sqlx::query_as(
        "SELECT id, question_text, option_a, option_b, option_c, option_d,
                correct_answer, difficulty, explanation
         FROM questions WHERE subject_id = ?",
    )
    .bind(subject_id)
    .fetch_all(&db_pool)
    .await?;

    let questions: Vec<Value> = rows
        .into_iter()
        .map(|(id, question, a, b, c, d, correct, difficulty, explanation)| {
            json!({
                "id": id,
                "question": question,
                "options": [a, b, c, d],
                "correct": correct,
                "difficulty": difficulty,
                "explanation": explanation,
            })
        })
        .collect();

    Ok(Json(Value::Array(questions)))
}
