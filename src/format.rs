//! Re-typing of column values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use thiserror::Error;

use crate::value::{Value, ValueKind};

/// Fallback layouts tried when a timestamp is parsed without a pattern.
const DEFAULT_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"];

/// Errors raised while converting values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A concrete value could not be converted to the target type.
    #[error("cannot convert {value:?} to {kind}: {reason}")]
    Conversion {
        value: Value,
        kind: ValueKind,
        reason: String,
    },
}

impl FormatError {
    fn conversion(value: &Value, kind: ValueKind, reason: impl Into<String>) -> Self {
        FormatError::Conversion {
            value: value.clone(),
            kind,
            reason: reason.into(),
        }
    }
}

/// Converts every value to `kind`, keeping [`Value::Null`] as is.
///
/// Integer conversion is tolerant: a string that is not an integer literal is
/// parsed as a float and truncated toward zero, as are doubles. `hint` is a
/// `strptime` pattern for [`ValueKind::Timestamp`] targets and a `strftime`
/// pattern for rendering timestamps as [`ValueKind::Str`].
pub fn format_values(
    values: &[Value],
    kind: ValueKind,
    hint: Option<&str>,
) -> Result<Vec<Value>, FormatError> {
    if hint.is_some() && matches!(kind, ValueKind::Int | ValueKind::Double | ValueKind::Bool) {
        debug!("format hint ignored for {} conversion", kind);
    }
    values
        .iter()
        .map(|value| format_value(value, kind, hint))
        .collect()
}

fn format_value(value: &Value, kind: ValueKind, hint: Option<&str>) -> Result<Value, FormatError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match kind {
        ValueKind::Int => to_int(value).map(Value::Int),
        ValueKind::Double => to_double(value).map(Value::Double),
        ValueKind::Bool => to_bool(value).map(Value::Bool),
        ValueKind::Str => Ok(Value::Str(to_text(value, hint))),
        ValueKind::Timestamp => to_timestamp(value, hint).map(Value::Timestamp),
        ValueKind::Null => Err(FormatError::conversion(
            value,
            kind,
            "null is not a conversion target",
        )),
    }
}

fn to_int(value: &Value) -> Result<i64, FormatError> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Bool(v) => Ok(i64::from(*v)),
        Value::Double(v) => truncate(*v).ok_or_else(|| {
            FormatError::conversion(value, ValueKind::Int, "not representable as an integer")
        }),
        Value::Str(text) => {
            let text = text.trim();
            if let Ok(parsed) = text.parse::<i64>() {
                return Ok(parsed);
            }
            let parsed = text
                .parse::<f64>()
                .map_err(|err| FormatError::conversion(value, ValueKind::Int, err.to_string()))?;
            truncate(parsed).ok_or_else(|| {
                FormatError::conversion(value, ValueKind::Int, "not representable as an integer")
            })
        }
        _ => Err(FormatError::conversion(
            value,
            ValueKind::Int,
            format!("unsupported source type {}", value.type_name()),
        )),
    }
}

/// Truncates toward zero, rejecting values outside the `i64` range.
fn truncate(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn to_double(value: &Value) -> Result<f64, FormatError> {
    match value {
        Value::Str(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|err| FormatError::conversion(value, ValueKind::Double, err.to_string())),
        other => other.as_f64().ok_or_else(|| {
            FormatError::conversion(
                value,
                ValueKind::Double,
                format!("unsupported source type {}", value.type_name()),
            )
        }),
    }
}

fn to_bool(value: &Value) -> Result<bool, FormatError> {
    match value {
        Value::Bool(v) => Ok(*v),
        Value::Int(v) => Ok(*v != 0),
        Value::Double(v) => Ok(*v != 0.0),
        Value::Str(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(FormatError::conversion(
                value,
                ValueKind::Bool,
                "expected true, false, 1 or 0",
            )),
        },
        _ => Err(FormatError::conversion(
            value,
            ValueKind::Bool,
            format!("unsupported source type {}", value.type_name()),
        )),
    }
}

fn to_text(value: &Value, hint: Option<&str>) -> String {
    match (value, hint) {
        (Value::Str(text), _) => text.clone(),
        (Value::Timestamp(ts), Some(pattern)) => ts.format(pattern).to_string(),
        (other, _) => other.to_string(),
    }
}

fn to_timestamp(value: &Value, hint: Option<&str>) -> Result<NaiveDateTime, FormatError> {
    if let (Value::Timestamp(ts), None) = (value, hint) {
        return Ok(*ts);
    }
    let text = value.to_string();
    let parsed = match hint {
        Some(pattern) => parse_timestamp(&text, pattern),
        None if matches!(value, Value::Str(_)) => DEFAULT_TIMESTAMP_FORMATS
            .iter()
            .find_map(|pattern| parse_timestamp(&text, pattern).ok())
            .ok_or_else(|| format!("no default layout matches {:?}", text)),
        None => Err(format!("unsupported source type {}", value.type_name())),
    };
    parsed.map_err(|reason| FormatError::conversion(value, ValueKind::Timestamp, reason))
}

/// Parses with `pattern`, accepting date-only patterns as midnight.
fn parse_timestamp(text: &str, pattern: &str) -> Result<NaiveDateTime, String> {
    match NaiveDateTime::parse_from_str(text, pattern) {
        Ok(ts) => Ok(ts),
        Err(err) => NaiveDate::parse_from_str(text, pattern)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| err.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truncation_rejects_non_finite() {
        assert_eq!(truncate(-2.9), Some(-2));
        assert_eq!(truncate(f64::NAN), None);
        assert_eq!(truncate(f64::INFINITY), None);
    }

    #[test]
    fn date_only_pattern_is_midnight() {
        let ts = parse_timestamp("1997-01-01", "%Y-%m-%d").unwrap();
        assert_eq!(ts.to_string(), "1997-01-01 00:00:00");
    }
}
