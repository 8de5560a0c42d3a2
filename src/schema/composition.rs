//! Conditional-composition keyword checks, gated behind the
//! `JSONStructureConditionalComposition` extension.
use super::SchemaValidator;
use crate::{
    error::{Diagnostic, DiagnosticKind},
    extensions::Extension,
    paths::JSONPointer,
};
use serde_json::{Map, Value};

pub(super) const COMPOSITION_KEYWORDS: [&str; 7] =
    ["allOf", "anyOf", "oneOf", "not", "if", "then", "else"];

pub(super) fn has_composition_keywords(object: &Map<String, Value>) -> bool {
    COMPOSITION_KEYWORDS
        .iter()
        .any(|keyword| object.contains_key(*keyword))
}

impl<'a> SchemaValidator<'a> {
    pub(super) fn check_composition_keywords(&mut self, schema: &Value, location: &JSONPointer) {
        if !self.extended {
            return;
        }
        let object = match schema.as_object() {
            Some(object) => object,
            None => return,
        };
        if !self.enabled(Extension::ConditionalComposition) {
            for keyword in &COMPOSITION_KEYWORDS {
                if object.contains_key(*keyword) {
                    self.push_kind(
                        &location.join(*keyword),
                        DiagnosticKind::RequiresExtension {
                            class: "Conditional composition",
                            keyword: (*keyword).to_string(),
                            extension: "JSONStructureConditionalComposition",
                        },
                    );
                }
            }
            return;
        }
        for keyword in &["allOf", "anyOf", "oneOf"] {
            if let Some(value) = object.get(*keyword) {
                let subpath = location.join(*keyword);
                match value.as_array() {
                    None => self
                        .diagnostics
                        .push(Diagnostic::shape(&subpath, *keyword, "an array")),
                    Some(members) if members.is_empty() => self.push_kind(
                        &subpath,
                        DiagnosticKind::EmptyComposition { keyword: *keyword },
                    ),
                    Some(members) => {
                        for (index, member) in members.iter().enumerate() {
                            if member.is_object() {
                                self.validate_schema_node(member, false, &subpath.join(index));
                            } else {
                                self.push_kind(
                                    &subpath.join(index),
                                    DiagnosticKind::CompositionItemNotSchema { keyword: *keyword },
                                );
                            }
                        }
                    }
                }
            }
        }
        for keyword in &["not", "if", "then", "else"] {
            if let Some(value) = object.get(*keyword) {
                let subpath = location.join(*keyword);
                if value.is_object() {
                    self.validate_schema_node(value, false, &subpath);
                } else {
                    self.diagnostics
                        .push(Diagnostic::shape(&subpath, *keyword, "a schema object"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util::{extended_schema_diagnostics, schema_diagnostics};
    use serde_json::{json, Value};
    use test_case::test_case;

    fn conditional_doc(body: Value) -> Value {
        let mut doc = json!({
            "$schema": "https://json-structure.org/meta/validation/v0/#",
            "$id": "https://example.com/schema"
        });
        for (key, value) in body.as_object().unwrap() {
            doc[key] = value.clone();
        }
        doc
    }

    #[test]
    fn composition_instead_of_type_is_accepted() {
        let doc = conditional_doc(json!({
            "allOf": [
                {"type": "object", "properties": {"a": {"type": "string"}}, "name": "A"},
                {"type": "object", "properties": {"b": {"type": "int32"}}, "name": "B"}
            ]
        }));
        let diagnostics = extended_schema_diagnostics(&doc);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn requires_extension_under_core_meta() {
        let doc = json!({
            "$schema": "https://json-structure.org/meta/core/v0/#",
            "$id": "https://example.com/schema",
            "oneOf": [{"type": "string", "name": "S"}]
        });
        assert!(extended_schema_diagnostics(&doc).iter().any(|d| d.contains(
            "Conditional composition keyword 'oneOf' requires JSONStructureConditionalComposition extension."
        )));
    }

    #[test]
    fn ignored_without_extended_flag() {
        // A plain (non-extended) run leaves composition keywords alone but
        // still demands type/$ref.
        let doc = conditional_doc(json!({"not": {"type": "string"}}));
        let diagnostics = schema_diagnostics(&doc);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test_case(json!({"allOf": "nope"}), "'allOf' must be an array.")]
    #[test_case(json!({"anyOf": []}), "'anyOf' array cannot be empty.")]
    #[test_case(json!({"oneOf": [17]}), "'oneOf' array items must be schema objects.")]
    #[test_case(json!({"not": []}), "'not' must be a schema object.")]
    #[test_case(json!({"if": "x"}), "'if' must be a schema object.")]
    fn malformed_composition(body: Value, expected: &str) {
        let doc = conditional_doc(body);
        let diagnostics = extended_schema_diagnostics(&doc);
        assert!(
            diagnostics.iter().any(|d| d.contains(expected)),
            "{:?} missing {:?}",
            diagnostics,
            expected
        );
    }
}
