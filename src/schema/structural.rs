//! Per-node structural checks of the meta-schema validator.
use super::{composition, SchemaValidator};
use crate::{
    error::{Diagnostic, DiagnosticKind},
    paths::JSONPointer,
    type_tag,
};
use serde_json::{Map, Value};

impl<'a> SchemaValidator<'a> {
    /// Validates one schema object: name/abstract/`$extends`, the
    /// `type`-XOR-`$ref`-XOR-composition rule, and the per-type constraints.
    pub(super) fn validate_schema_node(
        &mut self,
        schema: &Value,
        is_root: bool,
        location: &JSONPointer,
    ) {
        let object = match schema.as_object() {
            Some(object) => object,
            None => {
                self.push(location, "Must be an object to be a schema.");
                return;
            }
        };
        if self.extended {
            self.check_composition_keywords(schema, location);
        }
        if is_root
            && object.contains_key("type")
            && !object.contains_key("name")
            && !object["type"].is_array()
        {
            self.push(
                location,
                "Root schema with 'type' must have a 'name' property.",
            );
        }
        if let Some(name) = object.get("name") {
            let subpath = location.join("name");
            match name.as_str() {
                Some(name) => {
                    if !self.identifier.is_match(name) {
                        self.push(&subpath, "'name' must match the identifier pattern.");
                    }
                }
                None => self
                    .diagnostics
                    .push(Diagnostic::shape(&subpath, "name", "a string")),
            }
        }
        if let Some(abstract_flag) = object.get("abstract") {
            if !abstract_flag.is_boolean() {
                self.diagnostics.push(Diagnostic::shape(
                    &location.join("abstract"),
                    "abstract",
                    "boolean",
                ));
            }
        }
        if let Some(extends) = object.get("$extends") {
            let subpath = location.join("$extends");
            match extends.as_str() {
                Some(pointer) => {
                    self.check_json_pointer(extends, &subpath);
                    self.check_extends_conflicts(object, pointer, &subpath);
                }
                None => self.diagnostics.push(Diagnostic::shape(
                    &subpath,
                    "$extends",
                    "a JSON pointer string",
                )),
            }
        }

        let has_type_or_ref = object.contains_key("type") || object.contains_key("$ref");
        let has_composition = self.extended && composition::has_composition_keywords(object);
        if !has_type_or_ref && !has_composition {
            self.push(location, "Missing required 'type' or '$ref' in schema object.");
            return;
        }
        if object.contains_key("type") && object.contains_key("$ref") {
            self.push(location, "Cannot have both 'type' and '$ref'.");
            return;
        }
        if let Some(reference) = object.get("$ref") {
            let subpath = location.join("$ref");
            if reference.is_string() {
                self.check_json_pointer(reference, &subpath);
            } else {
                self.diagnostics
                    .push(Diagnostic::shape(&subpath, "$ref", "a string"));
            }
            return;
        }

        if let Some(type_value) = object.get("type") {
            self.check_type_value(object, type_value, location);
        }
        if self.extended && object.contains_key("type") {
            self.check_validation_keywords(object, location);
        }

        let declared = object.get("type").and_then(Value::as_str);
        for keyword in &["required", "additionalProperties"] {
            if object.contains_key(*keyword) {
                if let Some(declared) = declared {
                    if declared != "object" {
                        self.push_kind(
                            &location.join(*keyword),
                            DiagnosticKind::KeywordOnlyInObjectSchema { keyword: *keyword },
                        );
                    }
                }
            }
        }
        if let Some(options) = object.get("enum") {
            let subpath = location.join("enum");
            if !options.is_array() {
                self.push(&subpath, "Enum must be an array.");
            }
            if declared.map_or(false, type_tag::is_compound) {
                self.push_kind(&subpath, DiagnosticKind::CompoundKeyword { keyword: "enum" });
            }
        }
        if object.contains_key("const") && declared.map_or(false, type_tag::is_compound) {
            self.push_kind(
                &location.join("const"),
                DiagnosticKind::CompoundKeyword { keyword: "const" },
            );
        }
    }

    /// Inheritance must not re-declare base properties; catching this here
    /// keeps the conflict a schema-level finding rather than one deferred to
    /// instance validation.
    fn check_extends_conflicts(
        &mut self,
        object: &Map<String, Value>,
        pointer: &str,
        location: &JSONPointer,
    ) {
        let base_properties = match crate::pointer::resolve(self.doc, pointer)
            .and_then(|base| base.get("properties"))
            .and_then(Value::as_object)
        {
            Some(base_properties) => base_properties,
            None => return,
        };
        if let Some(own_properties) = object.get("properties").and_then(Value::as_object) {
            for property in base_properties.keys() {
                if own_properties.contains_key(property) {
                    self.push_kind(
                        location,
                        DiagnosticKind::InheritedPropertyRedefined {
                            property: property.clone(),
                        },
                    );
                }
            }
        }
    }

    fn check_type_value(
        &mut self,
        object: &Map<String, Value>,
        type_value: &Value,
        location: &JSONPointer,
    ) {
        let subpath = location.join("type");
        match type_value {
            Value::Array(members) => {
                if members.is_empty() {
                    self.push(&subpath, "Type union cannot be empty.");
                } else {
                    for (index, member) in members.iter().enumerate() {
                        self.check_union_member(member, &subpath.join(index));
                    }
                }
            }
            Value::Object(type_object) => {
                if let Some(reference) = type_object.get("$ref") {
                    self.check_json_pointer(reference, &subpath.join("$ref"));
                } else if type_object.contains_key("type")
                    || type_object.contains_key("properties")
                {
                    self.validate_schema_node(type_value, false, &location.join("type(inline)"));
                } else {
                    self.push(&subpath, "Type dict must have '$ref' or be a valid schema object.");
                }
            }
            Value::String(name) => {
                if !type_tag::is_primitive(name) && !type_tag::is_compound(name) {
                    self.push_kind(
                        &subpath,
                        DiagnosticKind::UnknownTypeName { name: name.clone() },
                    );
                } else {
                    match name.as_str() {
                        "object" => self.check_object_schema(object, location),
                        "array" | "set" => self.check_items_schema(object, name, location),
                        "map" => self.check_map_schema(object, location),
                        "tuple" => self.check_tuple_schema(object, location),
                        "choice" => self.check_choice_schema(object, location),
                        _ => {}
                    }
                }
            }
            _ => self.push(&subpath, "Type must be a string, list, or object with $ref."),
        }
    }

    /// Union members are primitive names or `$ref` objects; inline compound
    /// definitions are not permitted.
    fn check_union_member(&mut self, member: &Value, location: &JSONPointer) {
        match member {
            Value::String(name) => {
                if !type_tag::is_primitive(name) && !type_tag::is_compound(name) {
                    self.push_kind(
                        location,
                        DiagnosticKind::UnknownUnionTypeName { name: name.clone() },
                    );
                }
                if type_tag::is_compound(name) {
                    self.push_kind(
                        location,
                        DiagnosticKind::CompoundTypeInUnion { name: name.clone() },
                    );
                }
            }
            Value::Object(object) => match object.get("$ref") {
                Some(reference) => self.check_json_pointer(reference, &location.join("$ref")),
                None => self.push(
                    location,
                    "Inline compound definitions not allowed in union. Must be a $ref.",
                ),
            },
            _ => self.push(location, "Union item must be a string or an object with $ref."),
        }
    }

    /// `properties` is optional only when the object extends another type.
    fn check_object_schema(&mut self, object: &Map<String, Value>, location: &JSONPointer) {
        if !object.contains_key("properties") && !object.contains_key("$extends") {
            self.push(
                &location.join("properties"),
                "Object type must have 'properties' if not extending another type.",
            );
            return;
        }
        if let Some(properties) = object.get("properties") {
            self.check_properties(properties, location);
        }
    }

    fn check_properties(&mut self, properties: &Value, location: &JSONPointer) {
        let subpath = location.join("properties");
        let properties = match properties.as_object() {
            Some(properties) => properties,
            None => {
                self.push(&subpath, "Properties must be an object.");
                return;
            }
        };
        for (key, value) in properties {
            let property_path = subpath.join(key.as_str());
            if !self.identifier.is_match(key) {
                self.push_kind(
                    &property_path,
                    DiagnosticKind::IdentifierMismatch { key: key.clone() },
                );
            }
            if value.is_object() {
                self.validate_schema_node(value, false, &property_path);
            } else {
                self.push_kind(
                    &property_path,
                    DiagnosticKind::PropertyNotSchema { key: key.clone() },
                );
            }
        }
    }

    fn check_items_schema(
        &mut self,
        object: &Map<String, Value>,
        type_name: &str,
        location: &JSONPointer,
    ) {
        let subpath = location.join("items");
        match object.get("items") {
            None => self.push(
                &subpath,
                if type_name == "set" {
                    "Set type must have 'items'."
                } else {
                    "Array type must have 'items'."
                },
            ),
            Some(items) => {
                if items.is_object() {
                    self.validate_schema_node(items, false, &subpath);
                } else {
                    self.push(&subpath, "'items' must be an object (a schema).");
                }
            }
        }
    }

    fn check_map_schema(&mut self, object: &Map<String, Value>, location: &JSONPointer) {
        let subpath = location.join("values");
        match object.get("values") {
            None => self.push(&subpath, "Map type must have 'values'."),
            Some(values) => {
                if values.is_object() {
                    self.validate_schema_node(values, false, &subpath);
                } else {
                    self.push(&subpath, "'values' must be an object (a schema).");
                }
            }
        }
    }

    /// Tuples declare `name`, a `properties` map, and a `tuple` order array
    /// whose every element names a declared property.
    fn check_tuple_schema(&mut self, object: &Map<String, Value>, location: &JSONPointer) {
        if !object.contains_key("name") {
            self.push(
                &location.join("name"),
                "Tuple type must include a 'name' attribute.",
            );
        }
        if object.contains_key("properties") {
            self.check_properties(&object["properties"], location);
        } else {
            self.push(&location.join("properties"), "Tuple type must have 'properties'.");
        }
        let subpath = location.join("tuple");
        match object.get("tuple") {
            None => self.push(
                &subpath,
                "Tuple type must include the 'tuple' keyword defining the order of elements.",
            ),
            Some(Value::Array(order)) => {
                let properties = object.get("properties").and_then(Value::as_object);
                for (index, element) in order.iter().enumerate() {
                    match element.as_str() {
                        Some(element) => {
                            if let Some(properties) = properties {
                                if !properties.contains_key(element) {
                                    self.push_kind(
                                        &subpath.join(index),
                                        DiagnosticKind::TupleOrderUnknownProperty {
                                            element: element.to_string(),
                                        },
                                    );
                                }
                            }
                        }
                        None => self.diagnostics.push(Diagnostic::shape(
                            &subpath.join(index),
                            format!("tuple[{}]", index),
                            "a string",
                        )),
                    }
                }
            }
            Some(_) => self.push(&subpath, "'tuple' keyword must be an array of strings."),
        }
    }

    fn check_choice_schema(&mut self, object: &Map<String, Value>, location: &JSONPointer) {
        let subpath = location.join("choices");
        match object.get("choices") {
            None => self.push(&subpath, "Choice type must have 'choices'."),
            Some(Value::Object(choices)) => {
                for (name, choice) in choices {
                    let choice_path = subpath.join(name.as_str());
                    if choice.is_object() {
                        self.validate_schema_node(choice, false, &choice_path);
                    } else {
                        self.push_kind(
                            &choice_path,
                            DiagnosticKind::ChoiceNotSchema { name: name.clone() },
                        );
                    }
                }
            }
            Some(_) => self.push(&subpath, "'choices' must be an object (map)."),
        }
        if let Some(selector) = object.get("selector") {
            if !selector.is_string() {
                self.diagnostics.push(Diagnostic::shape(
                    &location.join("selector"),
                    "selector",
                    "a string",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util::{schema_diagnostics, schema_is_valid};
    use serde_json::{json, Value};
    use test_case::test_case;

    fn document(body: Value) -> Value {
        let mut doc = json!({
            "$schema": "https://json-structure.org/meta/core/v0/#",
            "$id": "https://example.com/schema"
        });
        for (key, value) in body.as_object().unwrap() {
            doc[key] = value.clone();
        }
        doc
    }

    #[test]
    fn object_requires_properties_without_extends() {
        let doc = document(json!({"name": "T", "type": "object"}));
        assert!(schema_diagnostics(&doc)[0]
            .contains("Object type must have 'properties' if not extending another type."));
    }

    #[test]
    fn object_with_extends_needs_no_properties() {
        let doc = document(json!({
            "name": "Derived",
            "type": "object",
            "$extends": "#/definitions/Base",
            "definitions": {
                "Base": {
                    "name": "Base",
                    "type": "object",
                    "properties": {"p": {"type": "string"}}
                }
            }
        }));
        schema_is_valid(&doc);
    }

    #[test]
    fn property_keys_match_identifier_pattern() {
        let doc = document(json!({
            "name": "T",
            "type": "object",
            "properties": {"bad-key": {"type": "string"}}
        }));
        assert!(schema_diagnostics(&doc)[0]
            .contains("Property key 'bad-key' does not match the identifier pattern."));
    }

    #[test]
    fn dollar_names_require_metaschema_mode() {
        let doc = document(json!({
            "name": "T",
            "type": "object",
            "properties": {"$extra": {"type": "string"}}
        }));
        assert!(!schema_diagnostics(&doc).is_empty());
        let diagnostics = crate::ValidationOptions::new()
            .with_metaschema_identifiers()
            .validate_schema(&mut doc.clone(), None);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test_case(json!({"name": "T", "type": "array"}), "Array type must have 'items'.")]
    #[test_case(json!({"name": "T", "type": "set"}), "Set type must have 'items'.")]
    #[test_case(json!({"name": "T", "type": "map"}), "Map type must have 'values'.")]
    #[test_case(json!({"name": "T", "type": "choice"}), "Choice type must have 'choices'.")]
    #[test_case(json!({"name": "T", "type": "frobnicate"}), "Type 'frobnicate' is not a recognized primitive or compound type.")]
    #[test_case(json!({"name": "T"}), "Missing required 'type' or '$ref' in schema object.")]
    #[test_case(json!({"name": "T", "type": "string", "$ref": "#"}), "Cannot have both 'type' and '$ref'.")]
    #[test_case(json!({"type": "string"}), "Root schema with 'type' must have a 'name' property.")]
    #[test_case(json!({"name": "T", "type": []}), "Type union cannot be empty.")]
    fn structural_failures(body: Value, expected: &str) {
        let doc = document(body);
        let diagnostics = schema_diagnostics(&doc);
        assert!(
            diagnostics.iter().any(|d| d.contains(expected)),
            "{:?} missing {:?}",
            diagnostics,
            expected
        );
    }

    #[test]
    fn union_members_are_primitives_or_refs() {
        let doc = document(json!({
            "name": "T",
            "type": ["string", "object", {"$ref": "#/definitions/D"}, {"inline": true}, 5],
            "definitions": {"D": {"name": "D", "type": "string"}}
        }));
        let diagnostics = schema_diagnostics(&doc);
        assert!(diagnostics
            .iter()
            .any(|d| d.contains("Inline compound type 'object' is not permitted in a union.")));
        assert!(diagnostics
            .iter()
            .any(|d| d.contains("Inline compound definitions not allowed in union.")));
        assert!(diagnostics
            .iter()
            .any(|d| d.contains("Union item must be a string or an object with $ref.")));
    }

    #[test]
    fn tuple_order_must_name_properties() {
        let doc = document(json!({
            "name": "Pair",
            "type": "tuple",
            "properties": {"x": {"type": "number"}, "y": {"type": "number"}},
            "tuple": ["x", "z"]
        }));
        assert!(schema_diagnostics(&doc)[0].contains(
            "Element 'z' in 'tuple' does not correspond to any property in 'properties'."
        ));
    }

    #[test]
    fn required_only_on_objects() {
        let doc = document(json!({"name": "T", "type": "string", "required": ["a"]}));
        assert!(schema_diagnostics(&doc)[0]
            .contains("'required' can only appear in an object schema."));
    }

    #[test]
    fn enum_rejected_on_compound_types() {
        let doc = document(json!({
            "name": "T",
            "type": "map",
            "values": {"type": "string"},
            "enum": [{"a": 1}]
        }));
        assert!(schema_diagnostics(&doc)[0].contains("'enum' cannot be used with compound types."));
    }

    #[test]
    fn inline_type_object_recurses() {
        let doc = document(json!({
            "name": "T",
            "type": "object",
            "properties": {
                "nested": {"type": {"type": "string"}},
                "via_ref": {"type": {"$ref": "#/definitions/D"}}
            },
            "definitions": {"D": {"name": "D", "type": "string"}}
        }));
        schema_is_valid(&doc);
    }

    #[test]
    fn extends_pointer_must_resolve() {
        let doc = document(json!({
            "name": "T",
            "type": "object",
            "$extends": "#/definitions/Nope"
        }));
        assert!(schema_diagnostics(&doc)[0]
            .contains("JSON Pointer segment '/Nope' not found."));
    }
}
