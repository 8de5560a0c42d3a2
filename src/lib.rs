//! # jsonstructure
//!
//! A crate for validating JSON Structure schema documents and data instances
//! against them. Both stages report ordered, human-readable diagnostics
//! instead of failing fast, so a single run surfaces every finding.
//!
//! Supports the JSON Structure Core draft plus its Import, Conditional
//! Composition and Validation extensions.
//!
//! ## Example:
//!
//! ```rust
//! use jsonstructure::ValidationOptions;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "$schema": "https://json-structure.org/meta/core/v0/#",
//!     "$id": "https://example.com/person",
//!     "name": "Person",
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string"},
//!         "age": {"type": "int32"}
//!     },
//!     "required": ["name"]
//! });
//! assert!(jsonstructure::validate_schema(&schema).is_empty());
//!
//! let validator = ValidationOptions::new().instance_validator(schema);
//! for diagnostic in validator.validate(&json!({"age": 200})) {
//!     println!("Validation error: {}", diagnostic)
//! }
//! ```
#![warn(
    clippy::cast_possible_truncation,
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::print_stdout,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]
pub mod error;
mod extensions;
mod imports;
mod instance;
mod options;
mod paths;
mod pointer;
mod regex_cache;
mod schema;
mod source;
mod type_tag;

pub use error::{Diagnostic, DiagnosticKind, Stage};
pub use extensions::Extension;
pub use imports::{FileMapResolver, ImportError, ResolveImport};
pub use instance::InstanceValidator;
pub use options::ValidationOptions;
pub use paths::JSONPointer;
use serde_json::Value;

#[cfg(feature = "reqwest")]
pub use imports::HttpResolver;

/// A shortcut for validating a schema document with default options.
///
/// The document is cloned first so import expansion never touches the
/// caller's value; use [`ValidationOptions::validate_schema`] to expand in
/// place.
/// ```rust
/// use jsonstructure::validate_schema;
/// use serde_json::json;
///
/// let schema = json!({
///     "$schema": "https://json-structure.org/meta/core/v0/#",
///     "$id": "https://example.com/s",
///     "name": "S",
///     "type": "string"
/// });
/// assert!(validate_schema(&schema).is_empty());
/// ```
#[must_use]
pub fn validate_schema(doc: &Value) -> Vec<Diagnostic> {
    ValidationOptions::new().validate_schema(&mut doc.clone(), None)
}

/// `true` when [`validate_schema`] returns no diagnostics.
#[must_use]
#[inline]
pub fn is_valid_schema(doc: &Value) -> bool {
    validate_schema(doc).is_empty()
}

/// A shortcut for validating `instance` against `schema` with default
/// options.
#[must_use]
pub fn validate_instance(schema: &Value, instance: &Value) -> Vec<Diagnostic> {
    ValidationOptions::new()
        .instance_validator(schema.clone())
        .validate(instance)
}

/// `true` when [`validate_instance`] returns no diagnostics.
#[must_use]
#[inline]
pub fn is_valid_instance(schema: &Value, instance: &Value) -> bool {
    validate_instance(schema, instance).is_empty()
}


#[cfg(test)]
mod tests {
    use super::{is_valid_instance, is_valid_schema};
    use serde_json::json;

    #[test]
    fn test_is_valid_schema() {
        let valid = json!({
            "$schema": "https://json-structure.org/meta/core/v0/#",
            "$id": "https://example.com/s",
            "name": "S",
            "type": "string"
        });
        let invalid = json!({"name": "S", "type": "string"});
        assert!(is_valid_schema(&valid));
        assert!(!is_valid_schema(&invalid));
    }

    #[test]
    fn test_is_valid_instance() {
        let schema = json!({
            "$schema": "https://json-structure.org/meta/core/v0/#",
            "$id": "https://example.com/s",
            "name": "S",
            "type": "string"
        });
        assert!(is_valid_instance(&schema, &json!("hello")));
        assert!(!is_valid_instance(&schema, &json!(123)));
    }
}
