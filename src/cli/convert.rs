//! JSON <-> Value conversion utilities

use crate::value::{ArrayValue, CompositeValue, PrimitiveKind, Value};

use super::CliError;

/// Convert serde_json::Value to a Value.
///
/// Integers become `Long` (or `BigInt` past `i64::MAX`), other numbers
/// `Double`, objects composites, and arrays must hold only booleans or only
/// numbers.
pub fn json_to_value(v: serde_json::Value) -> Result<Value, CliError> {
    let value = match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => number_to_value(&n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(array_to_value(arr)?),
        serde_json::Value::Object(obj) => {
            let mut record = CompositeValue::new("object");
            for (k, v) in obj {
                record.insert(k, json_to_value(v)?);
            }
            Value::Composite(record)
        }
    };
    Ok(value)
}

fn number_to_value(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Long(i)
    } else if let Some(u) = n.as_u64() {
        Value::BigInt(i128::from(u))
    } else {
        Value::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn array_to_value(arr: Vec<serde_json::Value>) -> Result<ArrayValue, CliError> {
    if !arr.is_empty() && arr.iter().all(serde_json::Value::is_boolean) {
        let items = arr.into_iter().map(|v| Value::Bool(v.as_bool() == Some(true)));
        return ArrayValue::new(PrimitiveKind::Bool, items.collect())
            .map_err(|e| CliError::Conversion(e.to_string()));
    }
    if arr.iter().all(serde_json::Value::is_i64) && !arr.is_empty() {
        let items = arr.iter().filter_map(serde_json::Value::as_i64).map(Value::Long);
        return ArrayValue::new(PrimitiveKind::Long, items.collect())
            .map_err(|e| CliError::Conversion(e.to_string()));
    }
    let mut numbers = Vec::with_capacity(arr.len());
    for item in &arr {
        let n = item
            .as_f64()
            .ok_or_else(|| CliError::Conversion(format!("mixed array element {}", item)))?;
        numbers.push(n);
    }
    Ok(ArrayValue::from_f64s(numbers))
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Convert a Value to serde_json::Value.
///
/// NaN and infinities have no JSON form and become `null`; big decimals are
/// written as strings to keep their exact digits.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Byte(n) => serde_json::Value::from(*n),
        Value::Short(n) => serde_json::Value::from(*n),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Long(n) => serde_json::Value::from(*n),
        Value::Float(f) => float_to_json(f64::from(*f)),
        Value::Double(f) => float_to_json(*f),
        Value::Char(c) => serde_json::Value::String(c.to_string()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Date(d) => serde_json::Value::String(d.to_rfc3339()),
        Value::BigInt(n) => {
            if let Ok(i) = i64::try_from(*n) {
                serde_json::Value::from(i)
            } else if let Ok(u) = u64::try_from(*n) {
                serde_json::Value::from(u)
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        Value::BigDecimal(d) => serde_json::Value::String(d.to_string()),
        Value::Composite(record) => serde_json::Value::Object(
            record
                .fields()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Array(arr) | Value::Buffer(arr) => {
            serde_json::Value::Array(arr.items().iter().map(value_to_json).collect())
        }
    }
}
