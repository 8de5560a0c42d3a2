//! The instance validator: checks a JSON value against a well-formed schema
//! document, resolving references, flattening `$extends`, applying add-ins
//! and evaluating conditional composition and validation constraints.
mod addins;
mod conditional;
mod format;
mod helpers;

use crate::{
    error::{Diagnostic, DiagnosticKind},
    extensions::{Extension, MetaSchema},
    imports::{process_imports, ResolveImport},
    paths::JSONPointer,
    pointer,
    regex_cache::RegexCache,
};
use ahash::AHashSet;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Is a valid regex");
    static ref DATETIME_RE: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+\-]\d{2}:\d{2})$"
    )
    .expect("Is a valid regex");
    static ref TIME_RE: Regex =
        Regex::new(r"^\d{2}:\d{2}:\d{2}(?:\.\d+)?$").expect("Is a valid regex");
    static ref JSONPOINTER_RE: Regex = Regex::new(r"^#(/[^/]+)*$").expect("Is a valid regex");
}

/// Validates instances against one schema document.
///
/// The document is loaded once (imports expanded eagerly when enabled) and
/// stays immutable afterwards; every [`validate`](Self::validate) call walks
/// it on demand.
#[derive(Debug)]
pub struct InstanceValidator {
    root: Value,
    meta: MetaSchema,
    import_diagnostics: Vec<Diagnostic>,
    patterns: RegexCache,
}

impl InstanceValidator {
    pub(crate) fn build(
        mut root: Value,
        allow_import: bool,
        resolver: &dyn ResolveImport,
    ) -> InstanceValidator {
        let mut import_diagnostics = Vec::new();
        if allow_import {
            process_imports(
                &mut root,
                &JSONPointer::root(),
                true,
                resolver,
                &mut import_diagnostics,
            );
        }
        let meta = MetaSchema::of_document(&root);
        InstanceValidator {
            root,
            meta,
            import_diagnostics,
            patterns: RegexCache::new(),
        }
    }

    /// Validates `instance` against the root schema and returns the ordered
    /// diagnostic list; empty means the instance conforms.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> Vec<Diagnostic> {
        let mut enabled = AHashSet::new();
        if let Some(uses) = self.root.get("$uses").and_then(Value::as_array) {
            for name in uses.iter().filter_map(Value::as_str) {
                if let Some(extension) = Extension::from_name(name) {
                    enabled.insert(extension);
                }
            }
        }
        if self.meta == MetaSchema::Extended {
            enabled.extend(Extension::ALL.iter().copied());
        }
        let mut walker = Walker {
            root: &self.root,
            meta: self.meta,
            patterns: &self.patterns,
            enabled,
            errors: self.import_diagnostics.clone(),
        };
        walker.validate_value(instance, &self.root, &JSONPointer::root());
        walker.errors
    }

    /// `true` when [`validate`](Self::validate) would return no diagnostics.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_empty()
    }
}

struct Walker<'a> {
    root: &'a Value,
    meta: MetaSchema,
    patterns: &'a RegexCache,
    enabled: AHashSet<Extension>,
    errors: Vec<Diagnostic>,
}

impl<'a> Walker<'a> {
    fn push(&mut self, location: &JSONPointer, kind: DiagnosticKind) {
        self.errors.push(Diagnostic::instance(location, kind));
    }

    fn validate_value(&mut self, instance: &Value, schema: &Value, path: &JSONPointer) {
        // Add-in switching driven by the meta-schema family and the
        // instance's own $uses clause.
        if let Value::Object(members) = instance {
            if let Some(uses) = members.get("$uses").and_then(Value::as_array) {
                let mut asks_for_addins = false;
                for name in uses.iter().filter_map(Value::as_str) {
                    match Extension::from_name(name) {
                        Some(Extension::ConditionalComposition) => {
                            asks_for_addins = true;
                            if self.meta == MetaSchema::Validation {
                                self.enabled.insert(Extension::ConditionalComposition);
                            }
                        }
                        Some(Extension::Validation) => {
                            asks_for_addins = true;
                            if self.meta == MetaSchema::Validation {
                                self.enabled.insert(Extension::Validation);
                            }
                        }
                        _ => {}
                    }
                }
                if asks_for_addins && self.meta == MetaSchema::Core {
                    self.push(path, DiagnosticKind::UnsupportedAddins);
                }
            }
        }

        // Resolve $ref chains lexically against the root document, tracking
        // the chain to diagnose cycles.
        let mut schema = Cow::Borrowed(schema);
        if schema.get("$ref").is_some() {
            let mut visited = AHashSet::new();
            while let Some(reference) = schema.get("$ref") {
                let reference = match reference.as_str() {
                    Some(reference) => reference.to_string(),
                    None => {
                        self.push(
                            path,
                            DiagnosticKind::UnresolvableRef {
                                reference: reference.to_string(),
                            },
                        );
                        return;
                    }
                };
                if !visited.insert(reference.clone()) {
                    self.push(path, DiagnosticKind::RefCycle { reference });
                    return;
                }
                match pointer::resolve(self.root, &reference) {
                    Some(target) => schema = Cow::Borrowed(target),
                    None => {
                        self.push(path, DiagnosticKind::UnresolvableRef { reference });
                        return;
                    }
                }
            }
        }

        let had_conditionals = if self.enabled.contains(&Extension::ConditionalComposition) {
            self.validate_conditionals(schema.as_ref(), instance, path)
        } else {
            false
        };

        if schema.get("type").is_none() {
            if !had_conditionals {
                self.push(path, DiagnosticKind::MissingType);
            }
            return;
        }

        // `type` given as `{ "$ref": … }`: splice in the referenced type and
        // merge its properties underneath the local ones.
        if matches!(schema.get("type"), Some(Value::Object(_))) {
            let reference = schema
                .get("type")
                .and_then(Value::as_object)
                .and_then(|type_object| type_object.get("$ref"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match reference {
                None => {
                    self.push(path, DiagnosticKind::InvalidType);
                    return;
                }
                Some(reference) => match pointer::resolve(self.root, &reference) {
                    None => {
                        self.push(
                            &path.join("type"),
                            DiagnosticKind::UnresolvableRef { reference },
                        );
                        return;
                    }
                    Some(resolved) => {
                        let mut merged = schema.as_ref().clone();
                        merged["type"] = resolved.get("type").cloned().unwrap_or(Value::Null);
                        if let Some(resolved_properties) =
                            resolved.get("properties").and_then(Value::as_object)
                        {
                            let mut properties = resolved_properties.clone();
                            if let Some(own) = schema.get("properties").and_then(Value::as_object)
                            {
                                for (key, value) in own {
                                    properties.insert(key.clone(), value.clone());
                                }
                            }
                            merged["properties"] = Value::Object(properties);
                        }
                        schema = Cow::Owned(merged);
                    }
                },
            }
        }

        // Union: first alternative that validates cleanly wins; otherwise
        // the aggregated trial diagnostics surface.
        if let Some(Value::Array(_)) = schema.get("type") {
            let members = match schema.get("type").and_then(Value::as_array) {
                Some(members) => members.clone(),
                None => return,
            };
            let mut causes = Vec::new();
            let mut matched = false;
            for member in &members {
                let trial = json!({ "type": member });
                let mark = self.errors.len();
                self.validate_value(instance, &trial, path);
                if self.errors.len() == mark {
                    matched = true;
                    break;
                }
                causes.extend(self.errors.drain(mark..).map(|d| d.to_string()));
            }
            if !matched {
                self.push(path, DiagnosticKind::UnionMismatch { causes });
            }
            return;
        }

        let type_name = match schema.get("type").and_then(Value::as_str) {
            Some(type_name) => type_name.to_string(),
            None => {
                self.push(path, DiagnosticKind::InvalidType);
                return;
            }
        };

        // Flatten $extends: base first, extending keys win, the pointer is
        // stripped. Base-introduced properties must not be re-declared.
        if let Some(reference) = schema
            .get("$extends")
            .and_then(Value::as_str)
            .map(str::to_string)
        {
            match pointer::resolve(self.root, &reference).and_then(Value::as_object) {
                None => {
                    self.push(path, DiagnosticKind::UnresolvableExtends { reference });
                    return;
                }
                Some(base) => {
                    let conflicts: Vec<String> = match (
                        base.get("properties").and_then(Value::as_object),
                        schema.get("properties").and_then(Value::as_object),
                    ) {
                        (Some(base_properties), Some(own_properties)) => base_properties
                            .keys()
                            .filter(|key| own_properties.contains_key(key.as_str()))
                            .cloned()
                            .collect(),
                        _ => Vec::new(),
                    };
                    for property in conflicts {
                        self.push(path, DiagnosticKind::ExtendsConflict { property });
                    }
                    let mut merged = base.clone();
                    if let Some(own) = schema.as_ref().as_object() {
                        for (key, value) in own {
                            merged.insert(key.clone(), value.clone());
                        }
                    }
                    merged.remove("$extends");
                    schema = Cow::Owned(Value::Object(merged));
                }
            }
        }

        if schema.get("abstract").and_then(Value::as_bool) == Some(true) {
            self.push(path, DiagnosticKind::AbstractSchema);
            return;
        }

        // Apply add-ins the instance opted into. The $uses member itself is
        // treated as a marker, not data, and skipped by the object checks.
        if let Value::Object(members) = instance {
            if members.contains_key("$uses") {
                schema = Cow::Owned(self.apply_uses(schema.as_ref(), members, path));
            }
        }

        self.dispatch(&type_name, instance, schema.as_ref(), path);

        if self.enabled.contains(&Extension::Validation) {
            self.validate_addins(schema.as_ref(), instance, path);
        }

        if let Some(expected) = schema.get("const") {
            if !helpers::equal(instance, expected) {
                self.push(
                    path,
                    DiagnosticKind::ConstMismatch {
                        expected: expected.clone(),
                    },
                );
            }
        }
        if let Some(options) = schema.get("enum") {
            if let Some(entries) = options.as_array() {
                if !entries.iter().any(|option| helpers::equal(instance, option)) {
                    self.push(
                        path,
                        DiagnosticKind::EnumMismatch {
                            options: options.clone(),
                        },
                    );
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)] // one arm per type tag
    fn dispatch(&mut self, type_name: &str, instance: &Value, schema: &Value, path: &JSONPointer) {
        match type_name {
            "any" => {}
            "string" => {
                if !instance.is_string() {
                    self.errors
                        .push(Diagnostic::type_mismatch(path, "string", instance));
                }
            }
            "number" => self.check_number(instance, path, "number"),
            "float" => self.check_number(instance, path, "float"),
            "double" => self.check_number(instance, path, "double"),
            "float8" => self.check_number(instance, path, "float8"),
            "boolean" => {
                if !instance.is_boolean() {
                    self.errors
                        .push(Diagnostic::type_mismatch(path, "boolean", instance));
                }
            }
            "null" => {
                if !instance.is_null() {
                    self.errors
                        .push(Diagnostic::type_mismatch(path, "null", instance));
                }
            }
            "int8" => self.check_integer(instance, path, "int8", i128::from(i8::MIN), i128::from(i8::MAX)),
            "int16" => {
                self.check_integer(instance, path, "int16", i128::from(i16::MIN), i128::from(i16::MAX))
            }
            "int32" => {
                self.check_integer(instance, path, "int32", i128::from(i32::MIN), i128::from(i32::MAX))
            }
            "uint8" => self.check_integer(instance, path, "uint8", 0, i128::from(u8::MAX)),
            "uint16" => self.check_integer(instance, path, "uint16", 0, i128::from(u16::MAX)),
            "uint32" => self.check_integer(instance, path, "uint32", 0, i128::from(u32::MAX)),
            "int64" => self.check_string_integer(
                instance,
                path,
                "int64",
                i128::from(i64::MIN),
                i128::from(i64::MAX),
            ),
            "uint64" => {
                self.check_string_integer(instance, path, "uint64", 0, i128::from(u64::MAX))
            }
            "int128" => match instance {
                Value::String(item) => {
                    if item.parse::<i128>().is_err() {
                        self.push(path, DiagnosticKind::InvalidFormat { type_name: "int128" });
                    }
                }
                _ => self.errors.push(Diagnostic::type_mismatch(
                    path,
                    "int128 as string",
                    instance,
                )),
            },
            "uint128" => match instance {
                Value::String(item) => {
                    if item.parse::<u128>().is_err() {
                        self.push(path, DiagnosticKind::InvalidFormat { type_name: "uint128" });
                    }
                }
                _ => self.errors.push(Diagnostic::type_mismatch(
                    path,
                    "uint128 as string",
                    instance,
                )),
            },
            "decimal" => match instance {
                Value::String(item) => {
                    if item.parse::<f64>().is_err() {
                        self.push(path, DiagnosticKind::InvalidFormat { type_name: "decimal" });
                    }
                }
                _ => self.errors.push(Diagnostic::type_mismatch(
                    path,
                    "decimal as string",
                    instance,
                )),
            },
            "date" => self.check_lexical(instance, path, &DATE_RE, "date (YYYY-MM-DD)"),
            "datetime" => self.check_lexical(instance, path, &DATETIME_RE, "datetime (RFC3339)"),
            "time" => self.check_lexical(instance, path, &TIME_RE, "time (HH:MM:SS)"),
            "duration" => {
                if !instance.is_string() {
                    self.push(
                        path,
                        DiagnosticKind::FormatExpected {
                            expected: "duration as string",
                        },
                    );
                }
            }
            "uuid" => match instance {
                Value::String(item) => {
                    if Uuid::parse_str(item).is_err() {
                        self.push(path, DiagnosticKind::InvalidFormat { type_name: "uuid" });
                    }
                }
                _ => self.push(
                    path,
                    DiagnosticKind::FormatExpected {
                        expected: "uuid as string",
                    },
                ),
            },
            "uri" => match instance {
                Value::String(item) => {
                    if Url::from_str(item).is_err() {
                        self.push(path, DiagnosticKind::InvalidFormat { type_name: "uri" });
                    }
                }
                _ => self.push(
                    path,
                    DiagnosticKind::FormatExpected {
                        expected: "uri as string",
                    },
                ),
            },
            "binary" => {
                if !instance.is_string() {
                    self.push(
                        path,
                        DiagnosticKind::FormatExpected {
                            expected: "binary (base64 string)",
                        },
                    );
                }
            }
            "jsonpointer" => {
                self.check_lexical(instance, path, &JSONPOINTER_RE, "JSON pointer format")
            }
            "object" => self.check_object(instance, schema, path),
            "array" => self.check_array(instance, schema, path, false),
            "set" => self.check_array(instance, schema, path, true),
            "map" => self.check_map(instance, schema, path),
            "tuple" => self.check_tuple(instance, schema, path),
            other => self.push(
                path,
                DiagnosticKind::UnsupportedType {
                    name: other.to_string(),
                },
            ),
        }
    }

    fn check_number(&mut self, instance: &Value, path: &JSONPointer, expected: &'static str) {
        if !instance.is_number() {
            self.errors
                .push(Diagnostic::type_mismatch(path, expected, instance));
        }
    }

    fn check_integer(
        &mut self,
        instance: &Value,
        path: &JSONPointer,
        type_name: &'static str,
        minimum: i128,
        maximum: i128,
    ) {
        let item = match instance {
            Value::Number(number) => {
                if let Some(item) = number.as_i64() {
                    Some(i128::from(item))
                } else {
                    number.as_u64().map(i128::from)
                }
            }
            _ => None,
        };
        match item {
            Some(item) => {
                if item < minimum || item > maximum {
                    self.push(path, DiagnosticKind::OutOfRange { type_name });
                }
            }
            None => self
                .errors
                .push(Diagnostic::type_mismatch(path, type_name, instance)),
        }
    }

    /// 64-bit integers travel as strings in instances.
    fn check_string_integer(
        &mut self,
        instance: &Value,
        path: &JSONPointer,
        type_name: &'static str,
        minimum: i128,
        maximum: i128,
    ) {
        let item = match instance {
            Value::String(item) => item,
            _ => {
                let expected = if type_name == "uint64" {
                    "uint64 as string"
                } else {
                    "int64 as string"
                };
                self.errors
                    .push(Diagnostic::type_mismatch(path, expected, instance));
                return;
            }
        };
        match item.parse::<i128>() {
            Ok(value) => {
                if value < minimum || value > maximum {
                    self.push(path, DiagnosticKind::OutOfRange { type_name });
                }
            }
            Err(_) => self.push(path, DiagnosticKind::InvalidFormat { type_name }),
        }
    }

    fn check_lexical(
        &mut self,
        instance: &Value,
        path: &JSONPointer,
        pattern: &Regex,
        expected: &'static str,
    ) {
        let matches = instance
            .as_str()
            .map_or(false, |item| pattern.is_match(item));
        if !matches {
            self.push(path, DiagnosticKind::FormatExpected { expected });
        }
    }

    fn check_object(&mut self, instance: &Value, schema: &Value, path: &JSONPointer) {
        let members = match instance.as_object() {
            Some(members) => members,
            None => {
                self.errors
                    .push(Diagnostic::type_mismatch(path, "object", instance));
                return;
            }
        };
        let empty = Map::new();
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if !members.contains_key(name) {
                    self.push(
                        path,
                        DiagnosticKind::MissingProperty {
                            property: name.to_string(),
                        },
                    );
                }
            }
        }
        for (name, property_schema) in properties {
            if let Some(value) = members.get(name) {
                if property_schema.is_object() {
                    self.validate_value(value, property_schema, &path.join(name.as_str()));
                }
            }
        }
        match schema.get("additionalProperties") {
            Some(Value::Bool(false)) => {
                for name in members.keys() {
                    if name != "$uses" && !properties.contains_key(name) {
                        self.push(
                            path,
                            DiagnosticKind::UnexpectedProperty {
                                property: name.clone(),
                            },
                        );
                    }
                }
            }
            Some(additional) if additional.is_object() => {
                for (name, value) in members {
                    if name != "$uses" && !properties.contains_key(name) {
                        self.validate_value(value, additional, &path.join(name.as_str()));
                    }
                }
            }
            _ => {}
        }
        if let Some(has_schema) = schema.get("has").filter(|has| has.is_object()) {
            let mut satisfied = false;
            for (name, value) in members {
                if name == "$uses" {
                    continue;
                }
                let mark = self.errors.len();
                self.validate_value(value, has_schema, &path.join(name.as_str()));
                let clean = self.errors.len() == mark;
                self.errors.truncate(mark);
                if clean {
                    satisfied = true;
                    break;
                }
            }
            if !satisfied {
                self.push(path, DiagnosticKind::HasNotSatisfied);
            }
        }
        if let Some(dependencies) = schema.get("dependentRequired").and_then(Value::as_object) {
            for (property, requirements) in dependencies {
                if !members.contains_key(property) {
                    continue;
                }
                if let Some(requirements) = requirements.as_array() {
                    for dependency in requirements.iter().filter_map(Value::as_str) {
                        if !members.contains_key(dependency) {
                            self.push(
                                path,
                                DiagnosticKind::MissingDependentProperty {
                                    property: property.clone(),
                                    dependency: dependency.to_string(),
                                },
                            );
                        }
                    }
                }
            }
        }
    }

    fn check_array(&mut self, instance: &Value, schema: &Value, path: &JSONPointer, set: bool) {
        let items = match instance.as_array() {
            Some(items) => items,
            None => {
                let expected = if set { "set (unique array)" } else { "array" };
                self.errors
                    .push(Diagnostic::type_mismatch(path, expected, instance));
                return;
            }
        };
        if set && !helpers::is_unique(items) {
            self.push(path, DiagnosticKind::DuplicateSetItems);
        }
        if let Some(items_schema) = schema
            .get("items")
            .filter(|items| items.as_object().map_or(false, |o| !o.is_empty()))
        {
            for (index, item) in items.iter().enumerate() {
                self.validate_value(item, items_schema, &path.join(index));
            }
        }
    }

    fn check_map(&mut self, instance: &Value, schema: &Value, path: &JSONPointer) {
        let members = match instance.as_object() {
            Some(members) => members,
            None => {
                self.errors
                    .push(Diagnostic::type_mismatch(path, "map (object)", instance));
                return;
            }
        };
        if let Some(values_schema) = schema
            .get("values")
            .filter(|values| values.as_object().map_or(false, |o| !o.is_empty()))
        {
            for (key, value) in members {
                if key == "$uses" {
                    continue;
                }
                self.validate_value(value, values_schema, &path.join(key.as_str()));
            }
        }
    }

    /// Tuples validate positionally against `properties` in insertion order.
    fn check_tuple(&mut self, instance: &Value, schema: &Value, path: &JSONPointer) {
        let items = match instance.as_array() {
            Some(items) => items,
            None => {
                self.errors
                    .push(Diagnostic::type_mismatch(path, "tuple (array)", instance));
                return;
            }
        };
        let empty = Map::new();
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        if items.len() != properties.len() {
            self.push(
                path,
                DiagnosticKind::TupleLength {
                    actual: items.len(),
                    expected: properties.len(),
                },
            );
            return;
        }
        for ((name, property_schema), item) in properties.iter().zip(items) {
            if property_schema.is_object() {
                self.validate_value(item, property_schema, &path.join(name.as_str()));
            }
        }
    }

    /// Merges `$offers` add-ins named by the instance into the effective
    /// schema's properties. Reserved extension names are switches handled
    /// elsewhere, and existing properties win over add-in ones.
    fn apply_uses(
        &mut self,
        schema: &Value,
        instance_members: &Map<String, Value>,
        path: &JSONPointer,
    ) -> Value {
        let uses: Vec<String> = match instance_members.get("$uses") {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        };
        let mut merged = schema.as_object().cloned().unwrap_or_default();
        if !merged.contains_key("properties") {
            merged.insert("properties".to_string(), Value::Object(Map::new()));
        }
        for name in uses
            .iter()
            .filter(|name| !Extension::is_reserved_addin(name))
        {
            let addin = match self.root.get("$offers").and_then(|offers| offers.get(name)) {
                Some(addin) => addin,
                None => {
                    self.push(path, DiagnosticKind::AddinNotOffered { name: name.clone() });
                    continue;
                }
            };
            match addin {
                Value::String(target) => match pointer::resolve(self.root, target) {
                    Some(resolved) => self.merge_addin(&mut merged, resolved, name, path),
                    None => self.push(path, DiagnosticKind::InvalidAddin { name: name.clone() }),
                },
                Value::Array(targets) => {
                    for target in targets.iter().filter_map(Value::as_str) {
                        if let Some(resolved) = pointer::resolve(self.root, target) {
                            self.merge_addin(&mut merged, resolved, name, path);
                        }
                    }
                }
                Value::Object(addin_object) => {
                    if let Some(target) = addin_object.get("$ref").and_then(Value::as_str) {
                        if let Some(resolved) = pointer::resolve(self.root, target) {
                            self.merge_addin(&mut merged, resolved, name, path);
                        }
                    } else {
                        self.merge_addin(&mut merged, addin, name, path);
                    }
                }
                _ => self.push(path, DiagnosticKind::InvalidAddin { name: name.clone() }),
            }
        }
        Value::Object(merged)
    }

    fn merge_addin(
        &mut self,
        merged: &mut Map<String, Value>,
        addin: &Value,
        addin_name: &str,
        path: &JSONPointer,
    ) {
        let addin_properties = match addin.get("properties").and_then(Value::as_object) {
            Some(addin_properties) => addin_properties.clone(),
            None => return,
        };
        if let Some(Value::Object(target)) = merged.get_mut("properties") {
            for (name, value) in addin_properties {
                if target.contains_key(&name) {
                    self.push(
                        path,
                        DiagnosticKind::AddinConflict {
                            property: name,
                            addin: addin_name.to_string(),
                        },
                    );
                } else {
                    target.insert(name, value);
                }
            }
        }
    }
}
