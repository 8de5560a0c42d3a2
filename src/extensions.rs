//! Extension names, meta-schema identification and the enabled-extension set.
use ahash::AHashSet;
use serde_json::Value;

/// Optional language extensions a schema document can enable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Extension {
    /// `$import` / `$importdefs` expansion.
    Import,
    /// Alternate member names (recognized, not validated).
    AlternateNames,
    /// Unit annotations (recognized, not validated).
    Units,
    /// `allOf`/`anyOf`/`oneOf`/`not`/`if`/`then`/`else`.
    ConditionalComposition,
    /// The numeric/string/array/object constraint keywords.
    Validation,
}

impl Extension {
    pub(crate) const ALL: [Extension; 5] = [
        Extension::Import,
        Extension::AlternateNames,
        Extension::Units,
        Extension::ConditionalComposition,
        Extension::Validation,
    ];

    pub(crate) fn from_name(name: &str) -> Option<Extension> {
        match name {
            "JSONStructureImport" => Some(Extension::Import),
            "JSONStructureAlternateNames" => Some(Extension::AlternateNames),
            "JSONStructureUnits" => Some(Extension::Units),
            "JSONStructureConditionalComposition" => Some(Extension::ConditionalComposition),
            "JSONStructureValidation" => Some(Extension::Validation),
            _ => None,
        }
    }

    /// Add-in names that are extension switches rather than `$offers` keys.
    pub(crate) fn is_reserved_addin(name: &str) -> bool {
        matches!(
            name,
            "JSONStructureConditionalComposition"
                | "JSONStructureValidation"
                | "JSONStructureAlternateNames"
                | "JSONStructureUnits"
        )
    }
}

/// Which meta-schema family the root `$schema` URI names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetaSchema {
    /// Core meta: optional add-ins are rejected when an instance asks for them.
    Core,
    /// Validation meta: conditional composition + validation auto-enabled.
    Validation,
    /// Extended meta: every known add-in auto-enabled.
    Extended,
}

impl MetaSchema {
    /// Identity is by substring match; URI normalization is out of scope.
    pub(crate) fn detect(uri: &str) -> MetaSchema {
        if uri.contains("extended") {
            MetaSchema::Extended
        } else if uri.contains("validation") {
            MetaSchema::Validation
        } else {
            MetaSchema::Core
        }
    }

    pub(crate) fn of_document(doc: &Value) -> MetaSchema {
        doc.get("$schema")
            .and_then(Value::as_str)
            .map(MetaSchema::detect)
            .unwrap_or(MetaSchema::Core)
    }
}

/// Computes the set of extensions a document enables, from its `$schema` URI
/// and its `$uses` array. Computed once per document; keyword dispatch
/// consults the set instead of re-parsing URIs.
pub(crate) fn enabled_extensions(doc: &Value) -> AHashSet<Extension> {
    let mut enabled = AHashSet::new();
    match MetaSchema::of_document(doc) {
        MetaSchema::Core => {}
        MetaSchema::Validation => {
            enabled.insert(Extension::ConditionalComposition);
            enabled.insert(Extension::Validation);
        }
        MetaSchema::Extended => {
            enabled.extend(Extension::ALL.iter().copied());
        }
    }
    if let Some(uses) = doc.get("$uses").and_then(Value::as_array) {
        for name in uses.iter().filter_map(Value::as_str) {
            if let Some(extension) = Extension::from_name(name) {
                enabled.insert(extension);
            }
        }
    }
    enabled
}

#[cfg(test)]
mod tests {
    use super::{enabled_extensions, Extension, MetaSchema};
    use serde_json::json;
    use test_case::test_case;

    #[test_case("https://json-structure.org/meta/core/v0/#", MetaSchema::Core)]
    #[test_case("https://json-structure.org/meta/validation/v0/#", MetaSchema::Validation)]
    #[test_case("https://json-structure.github.io/meta/extended/v0/#", MetaSchema::Extended)]
    #[test_case("https://example.com/whatever", MetaSchema::Core)]
    fn detection(uri: &str, expected: MetaSchema) {
        assert_eq!(MetaSchema::detect(uri), expected);
    }

    #[test]
    fn validation_meta_enables_both() {
        let doc = json!({"$schema": "https://json-structure.org/meta/validation/v0/#"});
        let enabled = enabled_extensions(&doc);
        assert!(enabled.contains(&Extension::ConditionalComposition));
        assert!(enabled.contains(&Extension::Validation));
        assert!(!enabled.contains(&Extension::Import));
    }

    #[test]
    fn extended_meta_enables_all() {
        let doc = json!({"$schema": "https://json-structure.github.io/meta/extended/v0/#"});
        assert_eq!(enabled_extensions(&doc).len(), Extension::ALL.len());
    }

    #[test]
    fn uses_adds_named_extensions() {
        let doc = json!({
            "$schema": "https://json-structure.org/meta/core/v0/#",
            "$uses": ["JSONStructureValidation", "NotAnExtension"]
        });
        let enabled = enabled_extensions(&doc);
        assert!(enabled.contains(&Extension::Validation));
        assert_eq!(enabled.len(), 1);
    }

    #[test]
    fn reserved_addins() {
        assert!(Extension::is_reserved_addin("JSONStructureUnits"));
        assert!(!Extension::is_reserved_addin("JSONStructureImport"));
        assert!(!Extension::is_reserved_addin("Extra"));
    }
}
