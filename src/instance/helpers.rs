//! Value comparison utilities for the instance validator.
use ahash::AHashSet;
use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

macro_rules! num_cmp {
    ($left:expr, $right:expr) => {
        if let Some(b) = $right.as_u64() {
            NumCmp::num_cmp($left, b)
        } else if let Some(b) = $right.as_i64() {
            NumCmp::num_cmp($left, b)
        } else {
            NumCmp::num_cmp($left, $right.as_f64().expect("Always valid"))
        }
    };
}

/// Mixed-width numeric comparison: `1` and `1.0` compare equal.
pub(crate) fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    if let Some(a) = left.as_u64() {
        num_cmp!(a, right)
    } else if let Some(a) = left.as_i64() {
        num_cmp!(a, right)
    } else {
        let a = left.as_f64().expect("Always valid");
        num_cmp!(a, right)
    }
}

/// Orders an instance against a numeric-keyword bound.
///
/// Numbers compare numerically; strings (the carrier of string-backed
/// numeric types) compare as 128-bit integers when both sides parse as
/// such, as floats otherwise. Mismatched or unparsable shapes are not
/// comparable.
pub(crate) fn compare_values(instance: &Value, limit: &Value) -> Option<Ordering> {
    match (instance, limit) {
        (Value::Number(instance), Value::Number(limit)) => compare_numbers(instance, limit),
        (Value::String(instance), Value::String(limit)) => {
            if let (Ok(a), Ok(b)) = (instance.parse::<i128>(), limit.parse::<i128>()) {
                Some(a.cmp(&b))
            } else if let (Ok(a), Ok(b)) = (instance.parse::<f64>(), limit.parse::<f64>()) {
                a.partial_cmp(&b)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Deep equality with numeric equivalence; object comparison is key-based
/// and ignores member order.
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Null, Value::Null) => true,
        (Value::Number(left), Value::Number(right)) => {
            compare_numbers(left, right) == Some(Ordering::Equal)
        }
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => false,
    }
}

#[inline]
pub(crate) fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right.iter()).all(|(a, b)| equal(a, b))
}

#[inline]
pub(crate) fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).map_or(false, |other| equal(value, other)))
}

/// Canonical JSON serialization: keys sorted lexicographically at every
/// level. Set uniqueness is defined over this form.
pub(crate) fn canonical(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(items) => {
            let mut keys: Vec<&String> = items.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (index, key) in keys.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key).expect("Always valid"));
                out.push(':');
                write_canonical(&items[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        _ => out.push_str(&value.to_string()),
    }
}

/// Are all items distinct under canonical serialization?
pub(crate) fn is_unique(items: &[Value]) -> bool {
    let mut seen = AHashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(canonical(item)))
}
