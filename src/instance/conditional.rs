//! Conditional composition: `allOf`, `anyOf`, `oneOf`, `not` and
//! `if`/`then`/`else`.
//!
//! Trial branches run against the shared diagnostic buffer using
//! length-marker rollback: record the length, evaluate, then keep or
//! truncate. The `if` probe is the only branch whose diagnostics are always
//! discarded.
use super::Walker;
use crate::{error::DiagnosticKind, paths::JSONPointer};
use serde_json::Value;

impl<'a> Walker<'a> {
    /// Evaluates every composition keyword present on `schema` and reports
    /// whether any was there (a schema node may consist of nothing else).
    pub(super) fn validate_conditionals(
        &mut self,
        schema: &Value,
        instance: &Value,
        path: &JSONPointer,
    ) -> bool {
        let mut present = false;
        if let Some(all_of) = schema.get("allOf") {
            present = true;
            if let Some(subschemas) = all_of.as_array() {
                for (index, subschema) in subschemas.iter().enumerate() {
                    if subschema.is_object() {
                        self.validate_value(instance, subschema, &path.join("allOf").join(index));
                    }
                }
            }
        }
        if let Some(any_of) = schema.get("anyOf") {
            present = true;
            if let Some(subschemas) = any_of.as_array() {
                let mut causes = Vec::new();
                let mut matched = false;
                for (index, subschema) in subschemas.iter().enumerate() {
                    let mark = self.errors.len();
                    self.validate_value(instance, subschema, &path.join("anyOf").join(index));
                    if self.errors.len() == mark {
                        matched = true;
                        break;
                    }
                    let drained: Vec<String> = self
                        .errors
                        .drain(mark..)
                        .map(|diagnostic| diagnostic.to_string())
                        .collect();
                    causes.push(format!("anyOf[{}]: {}", index, drained.join("; ")));
                }
                if !matched {
                    self.push(path, DiagnosticKind::AnyOfMismatch { causes });
                }
            }
        }
        if let Some(one_of) = schema.get("oneOf") {
            present = true;
            if let Some(subschemas) = one_of.as_array() {
                let mut causes = Vec::new();
                let mut matched = 0;
                for (index, subschema) in subschemas.iter().enumerate() {
                    let mark = self.errors.len();
                    self.validate_value(instance, subschema, &path.join("oneOf").join(index));
                    if self.errors.len() == mark {
                        matched += 1;
                    } else {
                        let drained: Vec<String> = self
                            .errors
                            .drain(mark..)
                            .map(|diagnostic| diagnostic.to_string())
                            .collect();
                        causes.push(format!("oneOf[{}]: {}", index, drained.join("; ")));
                    }
                }
                if matched != 1 {
                    self.push(path, DiagnosticKind::OneOfMismatch { matched, causes });
                }
            }
        }
        if let Some(subschema) = schema.get("not") {
            present = true;
            if subschema.is_object() {
                let mark = self.errors.len();
                self.validate_value(instance, subschema, &path.join("not"));
                let clean = self.errors.len() == mark;
                self.errors.truncate(mark);
                if clean {
                    self.push(path, DiagnosticKind::NotSchemaMatched);
                }
            }
        }
        if let Some(condition) = schema.get("if") {
            present = true;
            if condition.is_object() {
                let mark = self.errors.len();
                self.validate_value(instance, condition, &path.join("if"));
                let passed = self.errors.len() == mark;
                self.errors.truncate(mark);
                let branch = if passed { "then" } else { "else" };
                if let Some(subschema) = schema.get(branch) {
                    if subschema.is_object() {
                        self.validate_value(instance, subschema, &path.join(branch));
                    }
                }
            }
        }
        present
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util::instance_diagnostics;
    use serde_json::json;

    #[test]
    fn any_of_success_keeps_earlier_diagnostics() {
        // A failure recorded before the anyOf must survive a matching branch.
        let schema = json!({
            "$schema": "https://json-structure.github.io/meta/extended/v0/#",
            "$id": "https://example.com/s",
            "name": "Wrapper",
            "type": "object",
            "properties": {
                "first": {"type": "string"},
                "second": {
                    "anyOf": [
                        {"type": "int32", "name": "I"},
                        {"type": "string", "name": "S"}
                    ]
                }
            }
        });
        let diagnostics = instance_diagnostics(&schema, &json!({"first": 5, "second": 7}));
        assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
        assert!(diagnostics[0].contains("Expected string at #/first"));
    }

    #[test]
    fn one_of_lists_every_failing_branch() {
        let schema = json!({
            "$schema": "https://json-structure.github.io/meta/extended/v0/#",
            "$id": "https://example.com/s",
            "name": "Choice",
            "oneOf": [
                {"type": "int32", "name": "I"},
                {"type": "boolean", "name": "B"}
            ]
        });
        let diagnostics = instance_diagnostics(&schema, &json!("neither"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("oneOf[0]"));
        assert!(diagnostics[0].contains("oneOf[1]"));
    }
}
