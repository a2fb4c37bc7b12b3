//! Unit and temperature conversion.
//!
//! Linear categories convert through a per-unit factor relative to an
//! implicit base unit (meter, kilogram, second). Temperature uses the
//! pairwise formulas. An unknown category, or an unrecognized
//! temperature pair, passes the value through unchanged.

use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{AppError, AppResult};

#[derive(Deserialize)]
pub(crate) struct ConvertBody {
    #[serde(rename = "type", default)]
    conversion_type: String,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    from_unit: String,
    #[serde(default)]
    to_unit: String,
}

#[debug_handler]
pub(crate) async fn convert_units(
    State(db_pool): State<SqlitePool>,
    Json(ConvertBody { conversion_type, value, from_unit, to_unit }): Json<ConvertBody>,
) -> AppResult<Json<Value>> {
    let result = convert(&conversion_type, value, &from_unit, &to_unit)?;

    sqlx::query(
        "INSERT INTO conversions (conversion_type, from_value, from_unit, to_value, to_unit)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&conversion_type)
    .bind(value)
    .bind(&from_unit)
    .bind(result)
    .bind(&to_unit)
    .execute(&db_pool)
    .await?;

    Ok(Json(json!({ "result": result })))
}

pub fn convert(conversion_type: &str, value: f64, from_unit: &str, to_unit: &str) -> AppResult<f64> {
    let result = if conversion_type == "temperature" {
        convert_temperature(value, from_unit, to_unit)
    } else if is_linear_category(conversion_type) {
        let from_factor = factor(conversion_type, from_unit).ok_or_else(|| {
            AppError::bad_request(format!("Unknown {conversion_type} unit: {from_unit}"))
        })?;
        let to_factor = factor(conversion_type, to_unit).ok_or_else(|| {
            AppError::bad_request(format!("Unknown {conversion_type} unit: {to_unit}"))
        })?;
        value / from_factor * to_factor
    } else {
        value
    };

    Ok(round10(result))
}

pub fn round10(value: f64) -> f64 {
    (value * 1e10).round() / 1e10
}

fn is_linear_category(conversion_type: &str) -> bool {
    matches!(conversion_type, "length" | "weight" | "time")
}

/// Units per one base unit of the category.
fn factor(conversion_type: &str, unit: &str) -> Option<f64> {
    let factor = match conversion_type {
        "length" => match unit {
            "meter" => 1.0,
            "kilometer" => 0.001,
            "centimeter" => 100.0,
            "millimeter" => 1000.0,
            "mile" => 0.000621371,
            "yard" => 1.09361,
            "foot" => 3.28084,
            "inch" => 39.3701,
            _ => return None,
        },
        "weight" => match unit {
            "kilogram" => 1.0,
            "gram" => 1000.0,
            "milligram" => 1_000_000.0,
            "pound" => 2.20462,
            "ounce" => 35.274,
            _ => return None,
        },
        "time" => match unit {
            "second" => 1.0,
            "minute" => 1.0 / 60.0,
            "hour" => 1.0 / 3600.0,
            "day" => 1.0 / 86400.0,
            "week" => 1.0 / 604800.0,
            _ => return None,
        },
        _ => return None,
    };
    Some(factor)
}

fn convert_temperature(value: f64, from_unit: &str, to_unit: &str) -> f64 {
    match from_unit {
        "celsius" => match to_unit {
            "fahrenheit" => value * 9.0 / 5.0 + 32.0,
            "kelvin" => value + 273.15,
            _ => value,
        },
        "fahrenheit" => match to_unit {
            "celsius" => (value - 32.0) * 5.0 / 9.0,
            "kelvin" => (value - 32.0) * 5.0 / 9.0 + 273.15,
            _ => value,
        },
        "kelvin" => match to_unit {
            "celsius" => value - 273.15,
            "fahrenheit" => (value - 273.15) * 9.0 / 5.0 + 32.0,
            _ => value,
        },
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(conversion_type: &str, value: f64, from_unit: &str, to_unit: &str) {
        let there = convert(conversion_type, value, from_unit, to_unit).unwrap();
        let back = convert(conversion_type, there, to_unit, from_unit).unwrap();
        assert!(
            (back - value).abs() < 1e-9,
            "{value} {from_unit} -> {to_unit} -> {back}"
        );
    }

    #[test]
    fn linear_conversions_roundtrip() {
        roundtrip("length", 123.0, "meter", "foot");
        roundtrip("length", 5.0, "kilometer", "inch");
        roundtrip("weight", 2.5, "kilogram", "ounce");
        roundtrip("weight", 16.0, "pound", "gram");
        roundtrip("time", 7.0, "day", "second");
        roundtrip("time", 90.0, "minute", "hour");
    }

    #[test]
    fn length_factors() {
        assert_eq!(convert("length", 1.0, "kilometer", "meter").unwrap(), 1000.0);
        assert!((convert("length", 1.0, "meter", "foot").unwrap() - 3.28084).abs() < 1e-9);
    }

    #[test]
    fn temperature_pairs() {
        assert_eq!(convert("temperature", 0.0, "celsius", "fahrenheit").unwrap(), 32.0);
        assert_eq!(convert("temperature", 32.0, "fahrenheit", "celsius").unwrap(), 0.0);
        assert_eq!(convert("temperature", 100.0, "celsius", "kelvin").unwrap(), 373.15);
        assert_eq!(convert("temperature", 373.15, "kelvin", "celsius").unwrap(), 100.0);
    }

    #[test]
    fn unrecognized_temperature_pair_passes_through() {
        assert_eq!(convert("temperature", 55.0, "celsius", "rankine").unwrap(), 55.0);
        assert_eq!(convert("temperature", 55.0, "rankine", "celsius").unwrap(), 55.0);
    }

    #[test]
    fn unknown_category_passes_through() {
        assert_eq!(convert("volume", 42.0, "liter", "gallon").unwrap(), 42.0);
    }

    #[test]
    fn unknown_unit_in_known_category_is_rejected() {
        assert!(convert("length", 1.0, "meter", "furlong").is_err());
        assert!(convert("weight", 1.0, "stone", "gram").is_err());
    }

    #[test]
    fn results_round_to_ten_decimals() {
        let result = convert("time", 1.0, "second", "week").unwrap();
        assert_eq!(result, round10(1.0 / 604800.0));
    }
}
