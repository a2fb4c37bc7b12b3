use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::AppResult;

use super::auth;

#[derive(Deserialize)]
pub(crate) struct SubmitBody {
    subject_id: i64,
    score: i64,
    total_questions: i64,
}

#[debug_handler]
pub(crate) async fn submit_quiz(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(SubmitBody { subject_id, score, total_questions }): Json<SubmitBody>,
) -> AppResult<Json<Value>> {
    let user_id = auth::require_user(&session).await?;
    record_attempt(&db_pool, user_id, subject_id, score, total_questions).await?;
    Ok(Json(json!({ "message": "Quiz submitted successfully" })))
}

/// Stores the client-reported score verbatim. Server-side recomputation
/// against the question bank would replace this single call site.
pub(crate) async fn record_attempt(
    db_pool: &SqlitePool,
    user_id: i64,
    subject_id: i64,
    score: i64,
    total_questions: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_attempts (user_id, subject_id, score, total_questions)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(subject_id)
    .bind(score)
    .bind(total_questions)
    .execute(db_pool)
    .await?;
    Ok(())
}

#[debug_handler]
pub(crate) async fn leaderboard(State(db_pool): State<SqlitePool>) -> AppResult<Json<Value>> {
    let rows: Vec<(String, String, i64, i64, String)> = sqlx::query_as(
        "SELECT u.username, s.name, a.score, a.total_questions, a.completed_at
         FROM quiz_attempts a
         JOIN users u ON u.id = a.user_id
         JOIN subjects s ON s.id = a.subject_id
         ORDER BY a.score DESC
         LIMIT 10",
    )
    .fetch_all(&db_pool)
    .await?;

    let entries: Vec<Value> = rows
        .into_iter()
        .map(|(username, subject, score, total, completed_at)| {
            json!({
                "username": username,
                "subject": subject,
                "score": score,
                "total": total,
                "percentage": percentage(score, total),
                "date": completed_at.get(..10).unwrap_or(&completed_at),
            })
        })
        .collect();

    Ok(Json(Value::Array(entries)))
}

/// Score out of ten points per question, as a whole percentage.
fn percentage(score: i64, total_questions: i64) -> i64 {
    (score as f64 / (total_questions * 10) as f64 * 100.0).round() as i64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[debug_handler]
pub(crate) async fn user_stats(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Value>> {
    let user_id = auth::require_user(&session).await?;

    let attempts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT s.name, a.score
         FROM quiz_attempts a JOIN subjects s ON s.id = a.subject_id
         WHERE a.user_id = ? ORDER BY a.id",
    )
    .bind(user_id)
    .fetch_all(&db_pool)
    .await?;

    if attempts.is_empty() {
        return Ok(Json(json!({
            "total_quizzes": 0,
            "average_score": 0,
            "total_score": 0,
            "subjects_attempted": [],
        })));
    }

    let total_score: i64 = attempts.iter().map(|(_, score)| score).sum();
    let average_score = round2(total_score as f64 / attempts.len() as f64);

    // (subject, attempt count, score sum), in first-attempt order
    let mut subject_stats: Vec<(String, i64, i64)> = Vec::new();
    for (subject, score) in &attempts {
        match subject_stats.iter_mut().find(|(name, ..)| name == subject) {
            Some((_, count, total)) => {
                *count += 1;
                *total += score;
            }
            None => subject_stats.push((subject.clone(), 1, *score)),
        }
    }

    let subjects_attempted: Vec<Value> = subject_stats
        .into_iter()
        .map(|(subject, count, total)| {
            json!({
                "subject": subject,
                "attempts": count,
                "average": round2(total as f64 / count as f64),
            })
        })
        .collect();

    Ok(Json(json!({
        "total_quizzes": attempts.len(),
        "average_score": average_score,
        "total_score": total_score,
        "subjects_attempted": subjects_attempted,
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
        db::init_schema(AppKind::Quiz, &pool).await.unwrap();

        sqlx::query("INSERT INTO users (username, email, password) VALUES ('alice', 'a@x.y', 'h')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO subjects (name, icon, description) VALUES ('Python', 'P', 'd')")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn leaderboard_sorts_by_raw_score_descending() {
        let pool = test_pool().await;
        for score in [90, 80, 100] {
            super::record_attempt(&pool, 1, 1, score, 10).await.unwrap();
        }

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT u.username, a.score
             FROM quiz_attempts a JOIN users u ON u.id = a.user_id
             ORDER BY a.score DESC LIMIT 10",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let scores: Vec<i64> = rows.iter().map(|(_, score)| *score).collect();
        assert_eq!(scores, vec![100, 90, 80]);
        assert!(rows.iter().all(|(username, _)| username == "alice"));
    }

    #[tokio::test]
    async fn attempts_are_stored_verbatim() {
        let pool = test_pool().await;
        super::record_attempt(&pool, 1, 1, 130, 10).await.unwrap();

        let (score, total): (i64, i64) =
            sqlx::query_as("SELECT score, total_questions FROM quiz_attempts")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((score, total), (130, 10));
    }

    #[test]
    fn percentage_is_score_out_of_ten_per_question() {
        assert_eq!(super::percentage(80, 10), 80);
        assert_eq!(super::percentage(100, 10), 100);
        assert_eq!(super::percentage(25, 10), 25);
        assert_eq!(super::percentage(1, 3), 3);
    }

    #[test]
    fn averages_round_to_two_decimals() {
        assert_eq!(super::round2(10.0 / 3.0), 3.33);
        assert_eq!(super::round2(5.0), 5.0);
    }
}
