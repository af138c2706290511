//! Batch normalization: validation, numeric coercion, and provenance stamping.
//!
//! Validation runs before coercion and rejects the whole batch atomically;
//! there is no partial acceptance.

use crate::error::Error;
use crate::models::PricePoint;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const DATETIME_KEY: &str = "datetime";
const PRICE_KEYS: [&str; 4] = ["open", "high", "low", "close"];

/// Normalize a raw batch of string-keyed records into a price series.
///
/// Every point carries the requested symbol and a single `retrieved_at`
/// timestamp shared across the batch.
pub fn normalize_batch(
    raw: &[Map<String, Value>],
    symbol: &str,
    retrieved_at: DateTime<Utc>,
) -> Result<Vec<PricePoint>, Error> {
    if raw.is_empty() {
        return Err(Error::EmptyOrInvalidData(format!(
            "no records returned for {}",
            symbol
        )));
    }

    check_for_empty_data(raw)?;

    let mut series = Vec::with_capacity(raw.len());
    for record in raw {
        let coerced: Map<String, Value> = record
            .iter()
            .map(|(key, value)| {
                let value = if key == DATETIME_KEY {
                    value.clone()
                } else {
                    coerce_numeric(value)
                };
                (key.clone(), value)
            })
            .collect();

        series.push(build_point(&coerced, symbol, retrieved_at)?);
    }

    Ok(series)
}

/// Reject the batch if any record contains an absent, null, or empty value.
fn check_for_empty_data(raw: &[Map<String, Value>]) -> Result<(), Error> {
    for record in raw {
        let datetime = record
            .get(DATETIME_KEY)
            .and_then(Value::as_str)
            .unwrap_or("<missing datetime>");

        for key in std::iter::once(DATETIME_KEY).chain(PRICE_KEYS) {
            match record.get(key) {
                None => {
                    return Err(Error::EmptyOrInvalidData(format!(
                        "record at {} is missing field {}",
                        datetime, key
                    )))
                }
                Some(Value::Null) => {
                    return Err(Error::EmptyOrInvalidData(format!(
                        "record at {} has null field {}",
                        datetime, key
                    )))
                }
                Some(Value::String(s)) if s.is_empty() => {
                    return Err(Error::EmptyOrInvalidData(format!(
                        "record at {} has empty field {}",
                        datetime, key
                    )))
                }
                Some(_) => {}
            }
        }

        // Extra fields (volume etc.) are held to the same standard.
        for (key, value) in record {
            match value {
                Value::Null => {
                    return Err(Error::EmptyOrInvalidData(format!(
                        "record at {} has null field {}",
                        datetime, key
                    )))
                }
                Value::String(s) if s.is_empty() => {
                    return Err(Error::EmptyOrInvalidData(format!(
                        "record at {} has empty field {}",
                        datetime, key
                    )))
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Coerce a textual value to a number: float first, then integer, otherwise
/// leave the original value untouched.
fn coerce_numeric(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            if let Ok(f) = s.parse::<f64>() {
                Value::from(f)
            } else if let Ok(i) = s.parse::<i64>() {
                Value::from(i)
            } else {
                value.clone()
            }
        }
        other => other.clone(),
    }
}

fn build_point(
    record: &Map<String, Value>,
    symbol: &str,
    retrieved_at: DateTime<Utc>,
) -> Result<PricePoint, Error> {
    let datetime = record
        .get(DATETIME_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::EmptyOrInvalidData("record has a non-string datetime field".to_string())
        })?
        .to_string();

    let price = |key: &str| -> Result<f64, Error> {
        record.get(key).and_then(Value::as_f64).ok_or_else(|| {
            Error::EmptyOrInvalidData(format!(
                "record at {} has non-numeric field {}",
                datetime, key
            ))
        })
    };

    Ok(PricePoint {
        open: price("open")?,
        high: price("high")?,
        low: price("low")?,
        close: price("close")?,
        volume: record.get("volume").and_then(Value::as_f64),
        datetime,
        symbol: symbol.to_string(),
        retrieved_at,
    })
}
