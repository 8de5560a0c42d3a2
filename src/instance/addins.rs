//! The validation add-in keyword matrix, evaluated after the main type
//! check so constraints apply to an already-typed value.
use super::{format, helpers, Walker};
use crate::{error::DiagnosticKind, paths::JSONPointer, type_tag};
use fraction::{BigFraction, BigUint};
use serde_json::{Map, Value};
use std::cmp::Ordering;

impl<'a> Walker<'a> {
    pub(super) fn validate_addins(
        &mut self,
        schema: &Value,
        instance: &Value,
        path: &JSONPointer,
    ) {
        let type_name = match schema.get("type").and_then(Value::as_str) {
            Some(type_name) => type_name,
            None => return,
        };
        if type_tag::is_numeric(type_name) {
            self.numeric_addins(schema, instance, path);
        }
        match type_name {
            "string" => self.string_addins(schema, instance, path),
            "array" | "set" => self.array_addins(schema, instance, path),
            "object" => self.object_addins(schema, instance, path),
            "map" => self.map_addins(schema, instance, path),
            _ => {}
        }
    }

    fn numeric_addins(&mut self, schema: &Value, instance: &Value, path: &JSONPointer) {
        if let Some(limit) = schema.get("minimum") {
            match helpers::compare_values(instance, limit) {
                Some(Ordering::Less) => self.push(
                    path,
                    DiagnosticKind::LessThanMinimum {
                        limit: limit.clone(),
                    },
                ),
                Some(_) => {}
                None => self.push(path, DiagnosticKind::NotComparable { keyword: "minimum" }),
            }
        }
        if let Some(limit) = schema.get("maximum") {
            match helpers::compare_values(instance, limit) {
                Some(Ordering::Greater) => self.push(
                    path,
                    DiagnosticKind::GreaterThanMaximum {
                        limit: limit.clone(),
                    },
                ),
                Some(_) => {}
                None => self.push(path, DiagnosticKind::NotComparable { keyword: "maximum" }),
            }
        }
        if let Some(limit) = schema.get("exclusiveMinimum") {
            match helpers::compare_values(instance, limit) {
                Some(Ordering::Less) | Some(Ordering::Equal) => self.push(
                    path,
                    DiagnosticKind::BelowExclusiveMinimum {
                        limit: limit.clone(),
                    },
                ),
                Some(_) => {}
                None => self.push(
                    path,
                    DiagnosticKind::NotComparable {
                        keyword: "exclusiveMinimum",
                    },
                ),
            }
        }
        if let Some(limit) = schema.get("exclusiveMaximum") {
            match helpers::compare_values(instance, limit) {
                Some(Ordering::Greater) | Some(Ordering::Equal) => self.push(
                    path,
                    DiagnosticKind::AboveExclusiveMaximum {
                        limit: limit.clone(),
                    },
                ),
                Some(_) => {}
                None => self.push(
                    path,
                    DiagnosticKind::NotComparable {
                        keyword: "exclusiveMaximum",
                    },
                ),
            }
        }
        if let Some(multiple_of) = schema.get("multipleOf") {
            match is_multiple_of(instance, multiple_of) {
                Some(true) => {}
                Some(false) => self.push(
                    path,
                    DiagnosticKind::NotMultipleOf {
                        multiple_of: multiple_of.clone(),
                    },
                ),
                None => self.push(
                    path,
                    DiagnosticKind::NotComparable {
                        keyword: "multipleOf",
                    },
                ),
            }
        }
    }

    fn string_addins(&mut self, schema: &Value, instance: &Value, path: &JSONPointer) {
        let value = match instance.as_str() {
            Some(value) => value,
            None => return,
        };
        if let Some(limit) = schema.get("minLength").and_then(Value::as_u64) {
            if (bytecount::num_chars(value.as_bytes()) as u64) < limit {
                self.push(path, DiagnosticKind::TooShort { limit });
            }
        }
        if let Some(limit) = schema.get("maxLength").and_then(Value::as_u64) {
            if (bytecount::num_chars(value.as_bytes()) as u64) > limit {
                self.push(path, DiagnosticKind::TooLong { limit });
            }
        }
        if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
            match self.patterns.search(pattern, value) {
                Ok(true) => {}
                Ok(false) => self.push(
                    path,
                    DiagnosticKind::PatternMismatch {
                        pattern: pattern.to_string(),
                    },
                ),
                Err(_) => self.push(
                    path,
                    DiagnosticKind::BadRuntimePattern {
                        keyword: "pattern",
                        pattern: pattern.to_string(),
                    },
                ),
            }
        }
        if let Some(format_name) = schema.get("format").and_then(Value::as_str) {
            if format::check(format_name, value) == Some(false) {
                self.push(
                    path,
                    DiagnosticKind::FormatMismatch {
                        format: format_name.to_string(),
                    },
                );
            }
        }
    }

    fn array_addins(&mut self, schema: &Value, instance: &Value, path: &JSONPointer) {
        let items = match instance.as_array() {
            Some(items) => items,
            None => return,
        };
        if let Some(limit) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < limit {
                self.push(path, DiagnosticKind::TooFewItems { limit });
            }
        }
        if let Some(limit) = schema.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > limit {
                self.push(path, DiagnosticKind::TooManyItems { limit });
            }
        }
        if schema.get("uniqueItems").and_then(Value::as_bool) == Some(true)
            && !helpers::is_unique(items)
        {
            self.push(path, DiagnosticKind::NotUnique);
        }
        if let Some(contains) = schema.get("contains").filter(|contains| contains.is_object()) {
            let mut matched: u64 = 0;
            for (index, item) in items.iter().enumerate() {
                let mark = self.errors.len();
                self.validate_value(item, contains, &path.join(index));
                if self.errors.len() == mark {
                    matched += 1;
                }
                self.errors.truncate(mark);
            }
            let minimum = schema
                .get("minContains")
                .and_then(Value::as_u64)
                .unwrap_or(1);
            if matched < minimum {
                self.push(path, DiagnosticKind::TooFewContains { limit: minimum });
            }
            if let Some(maximum) = schema.get("maxContains").and_then(Value::as_u64) {
                if matched > maximum {
                    self.push(path, DiagnosticKind::TooManyContains { limit: maximum });
                }
            }
        }
    }

    fn object_addins(&mut self, schema: &Value, instance: &Value, path: &JSONPointer) {
        let members = match instance.as_object() {
            Some(members) => members,
            None => return,
        };
        let count = visible_count(members);
        if let Some(limit) = schema.get("minProperties").and_then(Value::as_u64) {
            if count < limit {
                self.push(path, DiagnosticKind::TooFewProperties { limit });
            }
        }
        if let Some(limit) = schema.get("maxProperties").and_then(Value::as_u64) {
            if count > limit {
                self.push(path, DiagnosticKind::TooManyProperties { limit });
            }
        }
        self.pattern_map_addin(schema, members, path, "patternProperties");
        self.names_addin(schema, members, path, "propertyNames", "propertyName");
    }

    fn map_addins(&mut self, schema: &Value, instance: &Value, path: &JSONPointer) {
        let members = match instance.as_object() {
            Some(members) => members,
            None => return,
        };
        let count = visible_count(members);
        if let Some(limit) = schema.get("minEntries").and_then(Value::as_u64) {
            if count < limit {
                self.push(path, DiagnosticKind::TooFewEntries { limit });
            }
        }
        if let Some(limit) = schema.get("maxEntries").and_then(Value::as_u64) {
            if count > limit {
                self.push(path, DiagnosticKind::TooManyEntries { limit });
            }
        }
        self.pattern_map_addin(schema, members, path, "patternKeys");
        self.names_addin(schema, members, path, "keyNames", "keyName");
    }

    /// `patternProperties` / `patternKeys`: every member whose name matches
    /// a pattern validates against that pattern's schema.
    fn pattern_map_addin(
        &mut self,
        schema: &Value,
        members: &Map<String, Value>,
        path: &JSONPointer,
        keyword: &'static str,
    ) {
        let patterns = match schema.get(keyword).and_then(Value::as_object) {
            Some(patterns) => patterns,
            None => return,
        };
        for (pattern, subschema) in patterns {
            let regex = match self.patterns.compile(pattern) {
                Ok(regex) => regex,
                Err(_) => {
                    self.push(
                        path,
                        DiagnosticKind::BadRuntimePattern {
                            keyword,
                            pattern: pattern.clone(),
                        },
                    );
                    continue;
                }
            };
            if !subschema.is_object() {
                continue;
            }
            for (name, value) in members {
                if name == "$uses" {
                    continue;
                }
                if regex.is_match(name).unwrap_or(false) {
                    self.validate_value(value, subschema, &path.join(name.as_str()));
                }
            }
        }
    }

    /// `propertyNames` / `keyNames`: every member name validates, as a
    /// string instance, against the names schema.
    fn names_addin(
        &mut self,
        schema: &Value,
        members: &Map<String, Value>,
        path: &JSONPointer,
        keyword: &'static str,
        label: &str,
    ) {
        let names_schema = match schema.get(keyword) {
            Some(names_schema) => names_schema,
            None => return,
        };
        let string_typed = names_schema
            .get("type")
            .and_then(Value::as_str)
            .map_or(false, |names_type| names_type == "string");
        if !string_typed {
            self.push(path, DiagnosticKind::NamesSchemaInvalid { keyword });
            return;
        }
        for name in members.keys() {
            if name == "$uses" {
                continue;
            }
            let name_value = Value::String(name.clone());
            self.validate_value(
                &name_value,
                names_schema,
                &path.join(format!("{}({})", label, name)),
            );
        }
    }
}

fn visible_count(members: &Map<String, Value>) -> u64 {
    members.keys().filter(|name| name.as_str() != "$uses").count() as u64
}

/// Exact multiple-of check; falls back to arbitrary-precision fractions when
/// the floating remainder is unusable.
fn is_multiple_of(instance: &Value, multiple_of: &Value) -> Option<bool> {
    let item = numeric_value(instance)?;
    let multiple_of = numeric_value(multiple_of)?;
    if multiple_of == 0.0 {
        return None;
    }
    let remainder = (item / multiple_of) % 1.0;
    if remainder.is_nan() {
        let fraction = BigFraction::from(item) / BigFraction::from(multiple_of);
        Some(fraction.denom().map_or(true, |denom| denom == &BigUint::from(1_u8)))
    } else {
        Some(remainder < f64::EPSILON)
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(item) => item.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::is_multiple_of;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!(10), &json!(2), Some(true))]
    #[test_case(&json!(7), &json!(2), Some(false))]
    #[test_case(&json!(2.5), &json!(0.5), Some(true))]
    #[test_case(&json!(2.3), &json!(0.5), Some(false))]
    #[test_case(&json!("12"), &json!("3"), Some(true))]
    #[test_case(&json!(true), &json!(2), None)]
    #[test_case(&json!(4), &json!(0), None)]
    fn multiple_of_checks(instance: &Value, multiple: &Value, expected: Option<bool>) {
        assert_eq!(is_multiple_of(instance, multiple), expected);
    }
}
