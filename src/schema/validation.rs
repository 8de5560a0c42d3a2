//! Well-formedness checks for the validation-addin keywords, gated behind
//! the `JSONStructureValidation` extension.
use super::SchemaValidator;
use crate::{
    error::{Diagnostic, DiagnosticKind},
    extensions::Extension,
    paths::JSONPointer,
    type_tag,
};
use serde_json::{Map, Value};

const NUMERIC_KEYWORDS: [&str; 5] = [
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];
const STRING_KEYWORDS: [&str; 4] = ["minLength", "maxLength", "pattern", "format"];
const ARRAY_KEYWORDS: [&str; 6] = [
    "minItems",
    "maxItems",
    "uniqueItems",
    "contains",
    "minContains",
    "maxContains",
];
const OBJECT_KEYWORDS: [&str; 10] = [
    "minProperties",
    "maxProperties",
    "minEntries",
    "maxEntries",
    "dependentRequired",
    "patternProperties",
    "patternKeys",
    "propertyNames",
    "keyNames",
    "has",
];

pub(super) const VALID_FORMATS: [&str; 11] = [
    "ipv4",
    "ipv6",
    "email",
    "idn-email",
    "hostname",
    "idn-hostname",
    "iri",
    "iri-reference",
    "uri-template",
    "relative-json-pointer",
    "regex",
];

impl<'a> SchemaValidator<'a> {
    pub(super) fn check_validation_keywords(
        &mut self,
        object: &Map<String, Value>,
        location: &JSONPointer,
    ) {
        if !self.enabled(Extension::Validation) {
            let default_keyword = ["default"];
            let gated = NUMERIC_KEYWORDS
                .iter()
                .chain(&STRING_KEYWORDS)
                .chain(&ARRAY_KEYWORDS)
                .chain(&OBJECT_KEYWORDS)
                .chain(&default_keyword);
            for keyword in gated {
                if object.contains_key(*keyword) {
                    self.push_kind(
                        &location.join(*keyword),
                        DiagnosticKind::RequiresExtension {
                            class: "Validation",
                            keyword: (*keyword).to_string(),
                            extension: "JSONStructureValidation",
                        },
                    );
                }
            }
            return;
        }
        let type_name = match object.get("type").and_then(Value::as_str) {
            Some(type_name) => type_name,
            None => return,
        };
        if type_tag::is_numeric(type_name) {
            self.check_numeric_keywords(object, location, type_name);
        } else if type_name == "string" {
            self.check_string_keywords(object, location);
        } else if type_name == "array" || type_name == "set" {
            self.check_array_keywords(object, location, type_name);
        } else if type_name == "object" || type_name == "map" {
            self.check_object_keywords(object, location, type_name);
        }
    }

    /// String-backed numeric types carry their bounds as strings, because
    /// their instances do too.
    fn check_numeric_keywords(
        &mut self,
        object: &Map<String, Value>,
        location: &JSONPointer,
        type_name: &str,
    ) {
        let expects_string = type_tag::is_string_backed_numeric(type_name);
        for keyword in &NUMERIC_KEYWORDS {
            let value = match object.get(*keyword) {
                Some(value) => value,
                None => continue,
            };
            let subpath = location.join(*keyword);
            if expects_string {
                if !value.is_string() {
                    self.push_kind(
                        &subpath,
                        DiagnosticKind::BoundMustBeString {
                            keyword: (*keyword).to_string(),
                            type_name: type_name.to_string(),
                        },
                    );
                }
            } else if !value.is_number() {
                self.diagnostics
                    .push(Diagnostic::shape(&subpath, *keyword, "a number"));
            } else if *keyword == "multipleOf"
                && value.as_f64().map_or(false, |multiple| multiple <= 0.0)
            {
                self.push(&subpath, "'multipleOf' must be a positive number.");
            }
        }
    }

    fn check_string_keywords(&mut self, object: &Map<String, Value>, location: &JSONPointer) {
        for keyword in &["minLength", "maxLength"] {
            if let Some(value) = object.get(*keyword) {
                if value.as_u64().is_none() {
                    self.diagnostics.push(Diagnostic::shape(
                        &location.join(*keyword),
                        *keyword,
                        "a non-negative integer",
                    ));
                }
            }
        }
        if let Some(pattern) = object.get("pattern") {
            let subpath = location.join("pattern");
            match pattern.as_str() {
                Some(pattern) => {
                    if let Err(error) = fancy_regex::Regex::new(pattern) {
                        self.push_kind(
                            &subpath,
                            DiagnosticKind::InvalidPattern {
                                keyword: "pattern".to_string(),
                                error: error.to_string(),
                            },
                        );
                    }
                }
                None => self
                    .diagnostics
                    .push(Diagnostic::shape(&subpath, "pattern", "a string")),
            }
        }
        if let Some(format) = object.get("format") {
            let subpath = location.join("format");
            match format.as_str() {
                Some(format) => {
                    if !VALID_FORMATS.contains(&format) {
                        self.push_kind(
                            &subpath,
                            DiagnosticKind::UnknownFormat {
                                format: format.to_string(),
                            },
                        );
                    }
                }
                None => self
                    .diagnostics
                    .push(Diagnostic::shape(&subpath, "format", "a string")),
            }
        }
    }

    fn check_array_keywords(
        &mut self,
        object: &Map<String, Value>,
        location: &JSONPointer,
        type_name: &str,
    ) {
        for keyword in &["minItems", "maxItems", "minContains", "maxContains"] {
            if let Some(value) = object.get(*keyword) {
                if value.as_u64().is_none() {
                    self.diagnostics.push(Diagnostic::shape(
                        &location.join(*keyword),
                        *keyword,
                        "a non-negative integer",
                    ));
                }
            }
        }
        if let Some(unique) = object.get("uniqueItems") {
            let subpath = location.join("uniqueItems");
            match unique.as_bool() {
                None => self
                    .diagnostics
                    .push(Diagnostic::shape(&subpath, "uniqueItems", "a boolean")),
                Some(false) if type_name == "set" => {
                    self.push(&subpath, "'uniqueItems' cannot be false for 'set' type.")
                }
                Some(_) => {}
            }
        }
        if let Some(contains) = object.get("contains") {
            let subpath = location.join("contains");
            if contains.is_object() {
                self.validate_schema_node(contains, false, &subpath);
            } else {
                self.diagnostics
                    .push(Diagnostic::shape(&subpath, "contains", "a schema object"));
            }
        }
        for keyword in &["minContains", "maxContains"] {
            if object.contains_key(*keyword) && !object.contains_key("contains") {
                self.push_kind(
                    &location.join(*keyword),
                    DiagnosticKind::RequiresContains {
                        keyword: (*keyword).to_string(),
                    },
                );
            }
        }
    }

    fn check_object_keywords(
        &mut self,
        object: &Map<String, Value>,
        location: &JSONPointer,
        type_name: &str,
    ) {
        for keyword in &["minProperties", "maxProperties", "minEntries", "maxEntries"] {
            let value = match object.get(*keyword) {
                Some(value) => value,
                None => continue,
            };
            let subpath = location.join(*keyword);
            if type_name == "map" && keyword.ends_with("Properties") {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::ContainerKeywordMismatch {
                        keyword: (*keyword).to_string(),
                        replacement: keyword.replace("Properties", "Entries"),
                        type_name: "map",
                    },
                );
            } else if type_name == "object" && keyword.ends_with("Entries") {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::ContainerKeywordMismatch {
                        keyword: (*keyword).to_string(),
                        replacement: keyword.replace("Entries", "Properties"),
                        type_name: "object",
                    },
                );
            }
            if value.as_u64().is_none() {
                self.diagnostics.push(Diagnostic::shape(
                    &subpath,
                    *keyword,
                    "a non-negative integer",
                ));
            }
        }
        if let Some(dependent) = object.get("dependentRequired") {
            let subpath = location.join("dependentRequired");
            if type_name != "object" {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::OnlyForType {
                        keyword: "dependentRequired",
                        type_name: "object",
                    },
                );
            } else {
                match dependent.as_object() {
                    None => self.push(&subpath, "'dependentRequired' must be an object."),
                    Some(entries) => {
                        for (property, dependencies) in entries {
                            let property_path = subpath.join(property.as_str());
                            match dependencies.as_array() {
                                None => self.diagnostics.push(Diagnostic::shape(
                                    &property_path,
                                    format!("dependentRequired/{}", property),
                                    "an array",
                                )),
                                Some(dependencies) => {
                                    for (index, dependency) in dependencies.iter().enumerate() {
                                        if !dependency.is_string() {
                                            self.diagnostics.push(Diagnostic::shape(
                                                &property_path.join(index),
                                                format!(
                                                    "dependentRequired/{}[{}]",
                                                    property, index
                                                ),
                                                "a string",
                                            ));
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        self.check_pattern_map(object, location, type_name, "patternProperties", "patternKeys");
        self.check_names_schema(object, location, type_name, "propertyNames", "keyNames");
        if let Some(has) = object.get("has") {
            let subpath = location.join("has");
            if has.is_object() {
                self.validate_schema_node(has, false, &subpath);
            } else {
                self.diagnostics
                    .push(Diagnostic::shape(&subpath, "has", "a schema object"));
            }
        }
    }

    fn check_pattern_map(
        &mut self,
        object: &Map<String, Value>,
        location: &JSONPointer,
        type_name: &str,
        object_keyword: &'static str,
        map_keyword: &'static str,
    ) {
        for keyword in &[object_keyword, map_keyword] {
            let value = match object.get(*keyword) {
                Some(value) => value,
                None => continue,
            };
            let subpath = location.join(*keyword);
            if type_name == "map" && *keyword == object_keyword {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::ContainerKeywordMismatch {
                        keyword: (*keyword).to_string(),
                        replacement: map_keyword.to_string(),
                        type_name: "map",
                    },
                );
            } else if type_name == "object" && *keyword == map_keyword {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::ContainerKeywordMismatch {
                        keyword: (*keyword).to_string(),
                        replacement: object_keyword.to_string(),
                        type_name: "object",
                    },
                );
            }
            match value.as_object() {
                None => self
                    .diagnostics
                    .push(Diagnostic::shape(&subpath, *keyword, "an object")),
                Some(entries) => {
                    for (pattern, schema) in entries {
                        let pattern_path = subpath.join(pattern.as_str());
                        if let Err(error) = fancy_regex::Regex::new(pattern) {
                            self.push_kind(
                                &pattern_path,
                                DiagnosticKind::InvalidPattern {
                                    keyword: format!("{}/{}", keyword, pattern),
                                    error: error.to_string(),
                                },
                            );
                        }
                        if schema.is_object() {
                            self.validate_schema_node(schema, false, &pattern_path);
                        } else {
                            self.diagnostics.push(Diagnostic::shape(
                                &pattern_path,
                                format!("{}/{}", keyword, pattern),
                                "a schema object",
                            ));
                        }
                    }
                }
            }
        }
    }

    fn check_names_schema(
        &mut self,
        object: &Map<String, Value>,
        location: &JSONPointer,
        type_name: &str,
        object_keyword: &'static str,
        map_keyword: &'static str,
    ) {
        for keyword in &[object_keyword, map_keyword] {
            let value = match object.get(*keyword) {
                Some(value) => value,
                None => continue,
            };
            let subpath = location.join(*keyword);
            if type_name == "map" && *keyword == object_keyword {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::ContainerKeywordMismatch {
                        keyword: (*keyword).to_string(),
                        replacement: map_keyword.to_string(),
                        type_name: "map",
                    },
                );
            } else if type_name == "object" && *keyword == map_keyword {
                self.push_kind(
                    &subpath,
                    DiagnosticKind::ContainerKeywordMismatch {
                        keyword: (*keyword).to_string(),
                        replacement: object_keyword.to_string(),
                        type_name: "object",
                    },
                );
            }
            match value.as_object() {
                Some(names_schema) => {
                    if let Some(names_type) = names_schema.get("type") {
                        if names_type.as_str() != Some("string") {
                            self.push_kind(
                                &subpath,
                                DiagnosticKind::NamesSchemaNotString { keyword: *keyword },
                            );
                        }
                    }
                    self.validate_schema_node(value, false, &subpath);
                }
                None => self
                    .diagnostics
                    .push(Diagnostic::shape(&subpath, *keyword, "a schema object")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util::extended_schema_diagnostics;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn validation_doc(body: Value) -> Value {
        let mut doc = json!({
            "$schema": "https://json-structure.org/meta/validation/v0/#",
            "$id": "https://example.com/schema",
            "name": "S"
        });
        for (key, value) in body.as_object().unwrap() {
            doc[key] = value.clone();
        }
        doc
    }

    #[test]
    fn gated_without_the_extension() {
        let doc = json!({
            "$schema": "https://json-structure.org/meta/core/v0/#",
            "$id": "https://example.com/schema",
            "name": "S",
            "type": "string",
            "minLength": 3
        });
        assert!(extended_schema_diagnostics(&doc).iter().any(|d| d.contains(
            "Validation keyword 'minLength' requires JSONStructureValidation extension."
        )));
    }

    #[test_case(json!({"type": "int32", "minimum": "3"}), "'minimum' must be a number.")]
    #[test_case(json!({"type": "int64", "minimum": 3}), "'minimum' for type 'int64' must be a string.")]
    #[test_case(json!({"type": "decimal", "maximum": 1.5}), "'maximum' for type 'decimal' must be a string.")]
    #[test_case(json!({"type": "number", "multipleOf": 0}), "'multipleOf' must be a positive number.")]
    #[test_case(json!({"type": "string", "minLength": -1}), "'minLength' must be a non-negative integer.")]
    #[test_case(json!({"type": "string", "maxLength": 2.5}), "'maxLength' must be a non-negative integer.")]
    #[test_case(json!({"type": "string", "pattern": "(unclosed"}), "'pattern' is not a valid regular expression")]
    #[test_case(json!({"type": "string", "format": "zipcode"}), "Unknown format 'zipcode'.")]
    #[test_case(json!({"type": "set", "items": {"type": "string"}, "uniqueItems": false}), "'uniqueItems' cannot be false for 'set' type.")]
    #[test_case(json!({"type": "array", "items": {"type": "string"}, "minContains": 1}), "'minContains' requires 'contains' to be present.")]
    #[test_case(json!({"type": "map", "values": {"type": "string"}, "minProperties": 1}), "Use 'minEntries' for map type instead of 'minProperties'.")]
    #[test_case(json!({"type": "object", "properties": {"a": {"type": "string"}}, "maxEntries": 1}), "Use 'maxProperties' for object type instead of 'maxEntries'.")]
    #[test_case(json!({"type": "map", "values": {"type": "string"}, "patternProperties": {"^x": {"type": "string"}}}), "Use 'patternKeys' for map type instead of 'patternProperties'.")]
    #[test_case(json!({"type": "object", "properties": {"a": {"type": "string"}}, "propertyNames": {"type": "int32"}}), "'propertyNames' schema must have type 'string'.")]
    #[test_case(json!({"type": "map", "values": {"type": "string"}, "dependentRequired": {"a": ["b"]}}), "'dependentRequired' only applies to object type.")]
    #[test_case(json!({"type": "object", "properties": {"a": {"type": "string"}}, "has": 17}), "'has' must be a schema object.")]
    fn malformed_validation_keywords(body: Value, expected: &str) {
        let doc = validation_doc(body);
        let diagnostics = extended_schema_diagnostics(&doc);
        assert!(
            diagnostics.iter().any(|d| d.contains(expected)),
            "{:?} missing {:?}",
            diagnostics,
            expected
        );
    }

    #[test]
    fn well_formed_validation_keywords() {
        let doc = validation_doc(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "minLength": 1, "maxLength": 80, "pattern": "^[a-z]+$"},
                "age": {"type": "int32", "minimum": 0, "maximum": 150},
                "balance": {"type": "decimal", "minimum": "0", "maximum": "1000000"},
                "tags": {
                    "type": "set",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "contains": {"type": "string", "pattern": "^x"},
                    "maxContains": 3
                },
                "attributes": {
                    "type": "map",
                    "values": {"type": "string"},
                    "minEntries": 1,
                    "patternKeys": {"^[a-z]+$": {"type": "string"}},
                    "keyNames": {"type": "string", "maxLength": 10}
                }
            },
            "required": ["name"],
            "dependentRequired": {"age": ["name"]},
            "has": {"type": "string"}
        }));
        let diagnostics = extended_schema_diagnostics(&doc);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn invalid_pattern_properties_regex() {
        let doc = validation_doc(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "patternProperties": {"(bad": {"type": "string"}}
        }));
        assert!(extended_schema_diagnostics(&doc)
            .iter()
            .any(|d| d.contains("'patternProperties/(bad' is not a valid regular expression")));
    }
}
