//! The meta-schema validator: checks that a schema document is itself
//! well-formed, including cross-references, identifier rules and extension
//! keyword gating.
mod composition;
mod structural;
mod validation;

use crate::{
    error::{Diagnostic, DiagnosticKind},
    extensions::{enabled_extensions, Extension},
    imports::ABSOLUTE_URI_RE,
    paths::JSONPointer,
    pointer::{self, PointerError},
};
use ahash::AHashSet;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref IDENTIFIER_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Is a valid regex");
    static ref DOLLAR_IDENTIFIER_RE: Regex =
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Is a valid regex");
}

pub(crate) struct SchemaValidator<'a> {
    doc: &'a Value,
    extended: bool,
    enabled: AHashSet<Extension>,
    identifier: &'static Regex,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SchemaValidator<'a> {
    pub(crate) fn new(doc: &'a Value, allow_dollar: bool, extended: bool) -> SchemaValidator<'a> {
        let enabled = if extended {
            enabled_extensions(doc)
        } else {
            AHashSet::new()
        };
        SchemaValidator {
            doc,
            extended,
            enabled,
            identifier: if allow_dollar {
                &DOLLAR_IDENTIFIER_RE
            } else {
                &IDENTIFIER_RE
            },
            diagnostics: Vec::new(),
        }
    }

    /// Runs every document-level check and returns the collected diagnostics.
    pub(crate) fn validate(mut self) -> Vec<Diagnostic> {
        let root = JSONPointer::root();
        let doc = match self.doc.as_object() {
            Some(doc) => doc,
            None => {
                self.push(&root, "Root of the document must be a JSON object.");
                return self.diagnostics;
            }
        };
        for keyword in &["$schema", "$id"] {
            if !doc.contains_key(*keyword) {
                self.diagnostics.push(Diagnostic::schema(
                    &root,
                    DiagnosticKind::MissingRootKeyword { keyword: *keyword },
                ));
            }
        }
        if let Some(value) = doc.get("$schema") {
            self.check_absolute_uri(value, "$schema", &root.join("$schema"));
        }
        if let Some(value) = doc.get("$id") {
            self.check_absolute_uri(value, "$id", &root.join("$id"));
        }
        if let Some(uses) = doc.get("$uses") {
            self.check_uses(uses, &root.join("$uses"));
        }
        if doc.contains_key("type") && doc.contains_key("$root") {
            self.push(
                &root,
                "Document cannot have both 'type' at root and '$root' at the same time.",
            );
        }
        if doc.contains_key("type") {
            self.validate_schema_node(self.doc, true, &root);
        }
        if let Some(pointer) = doc.get("$root") {
            self.check_json_pointer(pointer, &root.join("$root"));
        }
        if let Some(definitions) = doc.get("definitions") {
            let location = root.join("definitions");
            if definitions.is_object() {
                self.validate_namespace(definitions, &location);
            } else {
                self.push(&location, "definitions must be an object.");
            }
        }
        if let Some(offers) = doc.get("$offers") {
            self.check_offers(offers, &root.join("$offers"));
        }
        if self.extended && !doc.contains_key("type") {
            self.check_composition_keywords(self.doc, &root);
        }
        self.diagnostics
    }

    fn enabled(&self, extension: Extension) -> bool {
        self.enabled.contains(&extension)
    }

    fn push(&mut self, location: &JSONPointer, message: &'static str) {
        self.diagnostics
            .push(Diagnostic::structural(location, message));
    }

    fn push_kind(&mut self, location: &JSONPointer, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic::schema(location, kind));
    }

    fn check_absolute_uri(&mut self, value: &Value, keyword: &str, location: &JSONPointer) {
        match value {
            Value::String(uri) => {
                if !ABSOLUTE_URI_RE.is_match(uri) {
                    self.diagnostics.push(Diagnostic::shape(
                        location,
                        keyword,
                        "an absolute URI",
                    ));
                }
            }
            _ => self
                .diagnostics
                .push(Diagnostic::shape(location, keyword, "a string")),
        }
    }

    fn check_uses(&mut self, uses: &Value, location: &JSONPointer) {
        let entries = match uses.as_array() {
            Some(entries) => entries,
            None => {
                self.diagnostics
                    .push(Diagnostic::shape(location, "$uses", "an array"));
                return;
            }
        };
        for (index, entry) in entries.iter().enumerate() {
            match entry.as_str() {
                Some(name) => {
                    if self.extended && Extension::from_name(name).is_none() {
                        self.push_kind(
                            &location.join(index),
                            DiagnosticKind::UnknownExtension {
                                name: name.to_string(),
                            },
                        );
                    }
                }
                None => self.diagnostics.push(Diagnostic::shape(
                    &location.join(index),
                    format!("$uses[{}]", index),
                    "a string",
                )),
            }
        }
    }

    /// Definitions namespaces nest freely; anything carrying `type`, `$ref`
    /// or (in extended mode) composition keywords is a schema, everything
    /// else is another namespace level.
    fn validate_namespace(&mut self, namespace: &Value, location: &JSONPointer) {
        let entries = match namespace.as_object() {
            Some(entries) => entries,
            None => {
                self.push(location, "Must be an object to be a namespace.");
                return;
            }
        };
        for (name, value) in entries {
            let subpath = location.join(name.as_str());
            match value.as_object() {
                Some(object) => {
                    let is_schema = object.contains_key("type")
                        || object.contains_key("$ref")
                        || (self.extended && composition::has_composition_keywords(object));
                    if is_schema {
                        self.validate_schema_node(value, false, &subpath);
                    } else {
                        self.validate_namespace(value, &subpath);
                    }
                }
                None => self.push(&subpath, "Not a valid namespace or schema object."),
            }
        }
    }

    fn check_json_pointer(&mut self, pointer: &Value, location: &JSONPointer) {
        let pointer = match pointer.as_str() {
            Some(pointer) => pointer,
            None => {
                self.push(location, "JSON Pointer must be a string.");
                return;
            }
        };
        if !pointer.starts_with('#') {
            self.push(
                location,
                "JSON Pointer must start with '#' when referencing the same document.",
            );
            return;
        }
        match pointer::check(self.doc, pointer) {
            Ok(_) => {}
            Err(PointerError::NotFound(segment)) => {
                self.push_kind(location, DiagnosticKind::PointerSegmentNotFound { segment })
            }
            Err(PointerError::NotAnObject(segment)) => self.push_kind(
                location,
                DiagnosticKind::PointerSegmentNotObject { segment },
            ),
        }
    }

    fn check_offers(&mut self, offers: &Value, location: &JSONPointer) {
        let entries = match offers.as_object() {
            Some(entries) => entries,
            None => {
                self.diagnostics
                    .push(Diagnostic::shape(location, "$offers", "an object"));
                return;
            }
        };
        for (name, value) in entries {
            let subpath = location.join(name.as_str());
            match value {
                Value::String(_) => self.check_json_pointer(value, &subpath),
                Value::Array(pointers) => {
                    for (index, pointer) in pointers.iter().enumerate() {
                        if pointer.is_string() {
                            self.check_json_pointer(pointer, &subpath.join(index));
                        } else {
                            self.diagnostics.push(Diagnostic::shape(
                                &subpath.join(index),
                                format!("$offers/{}[{}]", name, index),
                                "a string (JSON Pointer)",
                            ));
                        }
                    }
                }
                _ => self.diagnostics.push(Diagnostic::shape(
                    &subpath,
                    format!("$offers/{}", name),
                    "a string or array of strings",
                )),
            }
        }
    }
}
