use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::AppResult;

use super::eval::{self, AngleMode};

fn default_mode() -> String {
    "basic".to_owned()
}

#[derive(Deserialize)]
pub(crate) struct CalculateBody {
    #[serde(default)]
    expression: String,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(rename = "angleMode")]
    angle_mode: Option<String>,
}

#[debug_handler]
pub(crate) async fn calculate(
    State(db_pool): State<SqlitePool>,
    Json(CalculateBody { expression, mode, angle_mode }): Json<CalculateBody>,
) -> AppResult<Json<Value>> {
    let angle_mode = AngleMode::parse(angle_mode.as_deref());
    let value = eval::evaluate(&expression, angle_mode)?;
    let result = eval::format_result(value);

    sqlx::query("INSERT INTO calculations (expression, result, mode) VALUES (?, ?, ?)")
        .bind(&expression)
        .bind(&result)
        .bind(&mode)
        .execute(&db_pool)
        .await?;

    Ok(Json(json!({ "result": result })))
}
