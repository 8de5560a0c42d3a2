//! Diagnostic types produced by both validation stages.
use crate::paths::JSONPointer;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Which validation stage emitted a diagnostic.
///
/// Schema-stage diagnostics carry their location as a suffix (optionally
/// resolved to a line/column in the source text); instance-stage messages
/// mention the instance path inline.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Stage {
    /// Emitted while checking the schema document itself.
    Schema,
    /// Emitted while checking a data instance against the schema.
    Instance,
}

/// A single validation finding: a structured kind plus the path it refers to.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Path within the schema document or the instance.
    pub location: JSONPointer,
    /// Line/column in the original source text, when it could be recovered.
    pub position: Option<(usize, usize)>,
    /// The stage that produced this diagnostic.
    pub stage: Stage,
}

/// Kinds of findings that may be reported during validation.
#[derive(Clone, Debug, Serialize)]
#[allow(missing_docs)]
pub enum DiagnosticKind {
    // --- schema document stage ---
    /// A fixed-text structural complaint about the schema document.
    Structural { message: &'static str },
    /// A required root keyword is absent.
    MissingRootKeyword { keyword: &'static str },
    /// A keyword value has the wrong JSON shape.
    Shape { keyword: String, expected: &'static str },
    /// A property key does not match the identifier pattern.
    IdentifierMismatch { key: String },
    /// A property value is not a schema object.
    PropertyNotSchema { key: String },
    /// A `choices` member is not a schema object.
    ChoiceNotSchema { name: String },
    /// `$uses` names an extension this validator does not know.
    UnknownExtension { name: String },
    /// A pointer segment does not exist in the document.
    PointerSegmentNotFound { segment: String },
    /// A pointer segment landed on a non-object.
    PointerSegmentNotObject { segment: String },
    /// `type` names something outside the primitive/compound sets.
    UnknownTypeName { name: String },
    /// A union member names an unrecognized type.
    UnknownUnionTypeName { name: String },
    /// A compound type appears inline in a union.
    CompoundTypeInUnion { name: String },
    /// Keyword permitted only on `object` schemas.
    KeywordOnlyInObjectSchema { keyword: &'static str },
    /// `enum`/`const` used together with a compound type.
    CompoundKeyword { keyword: &'static str },
    /// An extension keyword appeared while its extension is disabled.
    RequiresExtension {
        class: &'static str,
        keyword: String,
        extension: &'static str,
    },
    /// `allOf`/`anyOf`/`oneOf` with an empty array.
    EmptyComposition { keyword: &'static str },
    /// A composition array member is not a schema object.
    CompositionItemNotSchema { keyword: &'static str },
    /// A numeric bound on a string-backed numeric type must be a string.
    BoundMustBeString { keyword: String, type_name: String },
    /// A user-supplied pattern failed to compile.
    InvalidPattern { keyword: String, error: String },
    /// `format` names something outside the closed format set.
    UnknownFormat { format: String },
    /// `minContains`/`maxContains` without `contains`.
    RequiresContains { keyword: String },
    /// An object-flavored keyword used on a map schema, or vice versa.
    ContainerKeywordMismatch {
        keyword: String,
        replacement: String,
        type_name: &'static str,
    },
    /// Keyword restricted to one compound type.
    OnlyForType {
        keyword: &'static str,
        type_name: &'static str,
    },
    /// `propertyNames`/`keyNames` schema must be string-typed.
    NamesSchemaNotString { keyword: &'static str },
    /// A `tuple` order entry names no declared property.
    TupleOrderUnknownProperty { element: String },
    /// The extending schema re-declares a property its `$extends` base
    /// introduces.
    InheritedPropertyRedefined { property: String },
    /// `$import`/`$importdefs` encountered with imports disabled.
    ImportDisabled { keyword: String },
    /// `$import`/`$importdefs` carries a non-URI value.
    ImportValueInvalid {
        keyword: String,
        expected: &'static str,
    },
    /// The import resolver could not produce the external document.
    ImportFetchFailed { uri: String },
    /// The import resolver failed reading a mapped file.
    ImportLoadFailed { path: String, reason: String },

    // --- instance stage ---
    /// The instance opts into add-ins the plain core meta-schema rejects.
    UnsupportedAddins,
    /// `$ref` does not resolve within the root document.
    UnresolvableRef { reference: String },
    /// `$extends` does not resolve within the root document.
    UnresolvableExtends { reference: String },
    /// A `$ref` chain revisited a target.
    RefCycle { reference: String },
    /// The schema node carries no `type` (and no conditionals).
    MissingType,
    /// The schema node's `type` has an unusable shape.
    InvalidType,
    /// No union alternative accepted the instance.
    UnionMismatch { causes: Vec<String> },
    /// An inherited property was re-declared by the extending schema.
    ExtendsConflict { property: String },
    /// An abstract schema was used to validate an instance directly.
    AbstractSchema,
    /// `$uses` names an add-in absent from the root `$offers` map.
    AddinNotOffered { name: String },
    /// An add-in property collides with one already in the schema.
    AddinConflict { property: String, addin: String },
    /// An `$offers` entry has an unusable shape.
    InvalidAddin { name: String },
    /// The instance's JSON kind does not match the declared type.
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// A lexically-shaped primitive (date, time, pointer) did not match.
    FormatExpected { expected: &'static str },
    /// An integer-family value is outside the type's range.
    OutOfRange { type_name: &'static str },
    /// A string-backed value does not parse as its type.
    InvalidFormat { type_name: &'static str },
    /// A required object property is absent.
    MissingProperty { property: String },
    /// An object property is forbidden by `additionalProperties: false`.
    UnexpectedProperty { property: String },
    /// No property value satisfied the `has` schema.
    HasNotSatisfied,
    /// `dependentRequired` named a missing peer.
    MissingDependentProperty { property: String, dependency: String },
    /// A `set` instance repeated an element.
    DuplicateSetItems,
    /// A tuple instance's length differs from the declared arity.
    TupleLength { actual: usize, expected: usize },
    /// The type tag has no instance dispatch rule.
    UnsupportedType { name: String },
    /// No `anyOf` alternative accepted the instance.
    AnyOfMismatch { causes: Vec<String> },
    /// `oneOf` matched a number of alternatives other than one.
    OneOfMismatch { matched: usize, causes: Vec<String> },
    /// The `not` subschema accepted the instance.
    NotSchemaMatched,
    /// The instance differs from the `const` value.
    ConstMismatch { expected: Value },
    /// The instance appears nowhere in the `enum` list.
    EnumMismatch { options: Value },
    /// Numeric bound violations.
    LessThanMinimum { limit: Value },
    GreaterThanMaximum { limit: Value },
    BelowExclusiveMinimum { limit: Value },
    AboveExclusiveMaximum { limit: Value },
    /// The instance and a numeric bound are not comparable.
    NotComparable { keyword: &'static str },
    NotMultipleOf { multiple_of: Value },
    /// String length violations.
    TooShort { limit: u64 },
    TooLong { limit: u64 },
    /// The string does not match the schema `pattern`.
    PatternMismatch { pattern: String },
    /// The string does not satisfy the named `format`.
    FormatMismatch { format: String },
    /// Array cardinality violations.
    TooFewItems { limit: u64 },
    TooManyItems { limit: u64 },
    NotUnique,
    TooFewContains { limit: u64 },
    TooManyContains { limit: u64 },
    /// Object/map cardinality violations.
    TooFewProperties { limit: u64 },
    TooManyProperties { limit: u64 },
    TooFewEntries { limit: u64 },
    TooManyEntries { limit: u64 },
    /// `propertyNames`/`keyNames` schema was not string-typed at use time.
    NamesSchemaInvalid { keyword: &'static str },
    /// A pattern keyword failed to compile at validation time.
    BadRuntimePattern {
        keyword: &'static str,
        pattern: String,
    },
}

impl Diagnostic {
    pub(crate) fn schema(location: &JSONPointer, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            kind,
            location: location.clone(),
            position: None,
            stage: Stage::Schema,
        }
    }

    pub(crate) fn instance(location: &JSONPointer, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            kind,
            location: location.clone(),
            position: None,
            stage: Stage::Instance,
        }
    }

    pub(crate) fn structural(location: &JSONPointer, message: &'static str) -> Diagnostic {
        Diagnostic::schema(location, DiagnosticKind::Structural { message })
    }

    pub(crate) fn shape(
        location: &JSONPointer,
        keyword: impl Into<String>,
        expected: &'static str,
    ) -> Diagnostic {
        Diagnostic::schema(
            location,
            DiagnosticKind::Shape {
                keyword: keyword.into(),
                expected,
            },
        )
    }

    pub(crate) fn type_mismatch(
        location: &JSONPointer,
        expected: &'static str,
        instance: &Value,
    ) -> Diagnostic {
        Diagnostic::instance(
            location,
            DiagnosticKind::TypeMismatch {
                expected,
                actual: json_kind(instance),
            },
        )
    }
}

/// The JSON kind name used in "got ..." message tails.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) => {
            if number.is_f64() {
                "number"
            } else {
                "integer"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_causes(causes: &[String]) -> String {
    causes.join("; ")
}

impl Diagnostic {
    #[allow(clippy::too_many_lines)] // formatting only
    fn fmt_message(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.location;
        match &self.kind {
            DiagnosticKind::Structural { message } => f.write_str(message),
            DiagnosticKind::MissingRootKeyword { keyword } => {
                write!(f, "Missing required '{}' keyword at root.", keyword)
            }
            DiagnosticKind::Shape { keyword, expected } => {
                write!(f, "'{}' must be {}.", keyword, expected)
            }
            DiagnosticKind::IdentifierMismatch { key } => write!(
                f,
                "Property key '{}' does not match the identifier pattern.",
                key
            ),
            DiagnosticKind::PropertyNotSchema { key } => {
                write!(f, "Property '{}' must be an object (a schema).", key)
            }
            DiagnosticKind::ChoiceNotSchema { name } => {
                write!(f, "Choice value for '{}' must be an object (schema).", name)
            }
            DiagnosticKind::UnknownExtension { name } => {
                write!(f, "Unknown extension '{}' in $uses.", name)
            }
            DiagnosticKind::PointerSegmentNotFound { segment } => {
                write!(f, "JSON Pointer segment '/{}' not found.", segment)
            }
            DiagnosticKind::PointerSegmentNotObject { segment } => write!(
                f,
                "JSON Pointer segment '/{}' not applicable to non-object.",
                segment
            ),
            DiagnosticKind::UnknownTypeName { name } => write!(
                f,
                "Type '{}' is not a recognized primitive or compound type.",
                name
            ),
            DiagnosticKind::UnknownUnionTypeName { name } => {
                write!(f, "'{}' not recognized as a valid type name.", name)
            }
            DiagnosticKind::CompoundTypeInUnion { name } => write!(
                f,
                "Inline compound type '{}' is not permitted in a union. Must use a $ref.",
                name
            ),
            DiagnosticKind::KeywordOnlyInObjectSchema { keyword } => {
                write!(f, "'{}' can only appear in an object schema.", keyword)
            }
            DiagnosticKind::CompoundKeyword { keyword } => {
                write!(f, "'{}' cannot be used with compound types.", keyword)
            }
            DiagnosticKind::RequiresExtension {
                class,
                keyword,
                extension,
            } => write!(
                f,
                "{} keyword '{}' requires {} extension.",
                class, keyword, extension
            ),
            DiagnosticKind::EmptyComposition { keyword } => {
                write!(f, "'{}' array cannot be empty.", keyword)
            }
            DiagnosticKind::CompositionItemNotSchema { keyword } => {
                write!(f, "'{}' array items must be schema objects.", keyword)
            }
            DiagnosticKind::BoundMustBeString { keyword, type_name } => {
                write!(f, "'{}' for type '{}' must be a string.", keyword, type_name)
            }
            DiagnosticKind::InvalidPattern { keyword, error } => write!(
                f,
                "'{}' is not a valid regular expression: {}",
                keyword, error
            ),
            DiagnosticKind::UnknownFormat { format } => {
                write!(f, "Unknown format '{}'.", format)
            }
            DiagnosticKind::RequiresContains { keyword } => {
                write!(f, "'{}' requires 'contains' to be present.", keyword)
            }
            DiagnosticKind::ContainerKeywordMismatch {
                keyword,
                replacement,
                type_name,
            } => write!(
                f,
                "Use '{}' for {} type instead of '{}'.",
                replacement, type_name, keyword
            ),
            DiagnosticKind::OnlyForType { keyword, type_name } => {
                write!(f, "'{}' only applies to {} type.", keyword, type_name)
            }
            DiagnosticKind::NamesSchemaNotString { keyword } => {
                write!(f, "'{}' schema must have type 'string'.", keyword)
            }
            DiagnosticKind::TupleOrderUnknownProperty { element } => write!(
                f,
                "Element '{}' in 'tuple' does not correspond to any property in 'properties'.",
                element
            ),
            DiagnosticKind::InheritedPropertyRedefined { property } => write!(
                f,
                "Property '{}' is inherited via $extends and must not be redefined.",
                property
            ),
            DiagnosticKind::ImportDisabled { keyword } => write!(
                f,
                "JSONStructureImport keyword '{}' encountered but allow_import not enabled.",
                keyword
            ),
            DiagnosticKind::ImportValueInvalid { keyword, expected } => write!(
                f,
                "JSONStructureImport keyword '{}' value must be {}.",
                keyword, expected
            ),
            DiagnosticKind::ImportFetchFailed { uri } => {
                write!(f, "Unable to fetch external schema from {}.", uri)
            }
            DiagnosticKind::ImportLoadFailed { path, reason } => write!(
                f,
                "Failed to load imported schema from {}: {}",
                path, reason
            ),
            DiagnosticKind::UnsupportedAddins => write!(
                f,
                "Instance at {} references JSONStructureConditionalComposition or JSONStructureValidation addins but the schema does not support them",
                path
            ),
            DiagnosticKind::UnresolvableRef { reference } => {
                write!(f, "Cannot resolve $ref {} at {}", reference, path)
            }
            DiagnosticKind::UnresolvableExtends { reference } => {
                write!(f, "Cannot resolve $extends {} at {}", reference, path)
            }
            DiagnosticKind::RefCycle { reference } => {
                write!(f, "Cyclic $ref chain through {} at {}", reference, path)
            }
            DiagnosticKind::MissingType => write!(f, "Schema at {} has no 'type'", path),
            DiagnosticKind::InvalidType => write!(f, "Schema at {} has invalid 'type'", path),
            DiagnosticKind::UnionMismatch { causes } => write!(
                f,
                "Instance at {} does not match any type in union: [{}]",
                path,
                join_causes(causes)
            ),
            DiagnosticKind::ExtendsConflict { property } => write!(
                f,
                "Property '{}' is inherited via $extends and must not be redefined at {}",
                property, path
            ),
            DiagnosticKind::AbstractSchema => write!(
                f,
                "Abstract schema at {} cannot be used for instance validation",
                path
            ),
            DiagnosticKind::AddinNotOffered { name } => {
                write!(f, "Add-in '{}' not offered in $offers", name)
            }
            DiagnosticKind::AddinConflict { property, addin } => write!(
                f,
                "Add-in property '{}' from add-in '{}' conflicts with existing property",
                property, addin
            ),
            DiagnosticKind::InvalidAddin { name } => {
                write!(f, "Invalid add-in definition for '{}'", name)
            }
            DiagnosticKind::TypeMismatch { expected, actual } => {
                write!(f, "Expected {} at {}, got {}", expected, path, actual)
            }
            DiagnosticKind::FormatExpected { expected } => {
                write!(f, "Expected {} at {}", expected, path)
            }
            DiagnosticKind::OutOfRange { type_name } => {
                write!(f, "{} value at {} out of range", type_name, path)
            }
            DiagnosticKind::InvalidFormat { type_name } => {
                write!(f, "Invalid {} format at {}", type_name, path)
            }
            DiagnosticKind::MissingProperty { property } => {
                write!(f, "Missing required property '{}' at {}", property, path)
            }
            DiagnosticKind::UnexpectedProperty { property } => {
                write!(f, "Additional property '{}' not allowed at {}", property, path)
            }
            DiagnosticKind::HasNotSatisfied => write!(
                f,
                "Object at {} does not have any property satisfying 'has' schema",
                path
            ),
            DiagnosticKind::MissingDependentProperty {
                property,
                dependency,
            } => write!(
                f,
                "Property '{}' at {} requires dependent property '{}'",
                property, path, dependency
            ),
            DiagnosticKind::DuplicateSetItems => {
                write!(f, "Set at {} contains duplicate items", path)
            }
            DiagnosticKind::TupleLength { actual, expected } => write!(
                f,
                "Tuple at {} length {} does not equal expected {}",
                path, actual, expected
            ),
            DiagnosticKind::UnsupportedType { name } => {
                write!(f, "Unsupported type '{}' at {}", name, path)
            }
            DiagnosticKind::AnyOfMismatch { causes } => write!(
                f,
                "Instance at {} does not satisfy anyOf: [{}]",
                path,
                join_causes(causes)
            ),
            DiagnosticKind::OneOfMismatch { matched, causes } => write!(
                f,
                "Instance at {} must match exactly one subschema in oneOf; matched {}. Details: [{}]",
                path,
                matched,
                join_causes(causes)
            ),
            DiagnosticKind::NotSchemaMatched => write!(
                f,
                "Instance at {} should not validate against 'not' schema",
                path
            ),
            DiagnosticKind::ConstMismatch { expected } => {
                write!(f, "Value at {} does not equal const {}", path, expected)
            }
            DiagnosticKind::EnumMismatch { options } => {
                write!(f, "Value at {} not in enum {}", path, options)
            }
            DiagnosticKind::LessThanMinimum { limit } => {
                write!(f, "Value at {} is less than minimum {}", path, limit)
            }
            DiagnosticKind::GreaterThanMaximum { limit } => {
                write!(f, "Value at {} is greater than maximum {}", path, limit)
            }
            DiagnosticKind::BelowExclusiveMinimum { limit } => write!(
                f,
                "Value at {} is not greater than exclusive minimum {}",
                path, limit
            ),
            DiagnosticKind::AboveExclusiveMaximum { limit } => write!(
                f,
                "Value at {} is not less than exclusive maximum {}",
                path, limit
            ),
            DiagnosticKind::NotComparable { keyword } => {
                write!(f, "Cannot compare value at {} with {} constraint", path, keyword)
            }
            DiagnosticKind::NotMultipleOf { multiple_of } => {
                write!(f, "Value at {} is not a multiple of {}", path, multiple_of)
            }
            DiagnosticKind::TooShort { limit } => {
                write!(f, "String at {} shorter than minLength {}", path, limit)
            }
            DiagnosticKind::TooLong { limit } => {
                write!(f, "String at {} longer than maxLength {}", path, limit)
            }
            DiagnosticKind::PatternMismatch { pattern } => {
                write!(f, "String at {} does not match pattern {}", path, pattern)
            }
            DiagnosticKind::FormatMismatch { format } => write!(
                f,
                "String at {} does not appear to be a valid {}",
                path, format
            ),
            DiagnosticKind::TooFewItems { limit } => {
                write!(f, "Array at {} has fewer items than minItems {}", path, limit)
            }
            DiagnosticKind::TooManyItems { limit } => {
                write!(f, "Array at {} has more items than maxItems {}", path, limit)
            }
            DiagnosticKind::NotUnique => {
                write!(f, "Array at {} does not have unique items", path)
            }
            DiagnosticKind::TooFewContains { limit } => write!(
                f,
                "Array at {} has fewer than {} items matching 'contains'",
                path, limit
            ),
            DiagnosticKind::TooManyContains { limit } => write!(
                f,
                "Array at {} has more than {} items matching 'contains'",
                path, limit
            ),
            DiagnosticKind::TooFewProperties { limit } => write!(
                f,
                "Object at {} has fewer properties than minProperties {}",
                path, limit
            ),
            DiagnosticKind::TooManyProperties { limit } => write!(
                f,
                "Object at {} has more properties than maxProperties {}",
                path, limit
            ),
            DiagnosticKind::TooFewEntries { limit } => write!(
                f,
                "Map at {} has fewer entries than minEntries {}",
                path, limit
            ),
            DiagnosticKind::TooManyEntries { limit } => write!(
                f,
                "Map at {} has more entries than maxEntries {}",
                path, limit
            ),
            DiagnosticKind::NamesSchemaInvalid { keyword } => {
                write!(f, "{} schema must be of type string at {}", keyword, path)
            }
            DiagnosticKind::BadRuntimePattern { keyword, pattern } => write!(
                f,
                "Invalid regular expression '{}' in {} at {}",
                pattern, keyword, path
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_message(f)?;
        if let Stage::Schema = self.stage {
            match self.position {
                Some((line, column)) => write!(f, " (Line: {}, Column: {})", line, column),
                None => write!(f, " (Location: {}, line/column unknown)", self.location),
            }
        } else {
            Ok(())
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticKind};
    use crate::paths::JSONPointer;
    use serde_json::json;

    #[test]
    fn instance_message_embeds_path() {
        let path = JSONPointer::root().join("items").join(2);
        let diagnostic = Diagnostic::type_mismatch(&path, "string", &json!(17));
        assert_eq!(
            diagnostic.to_string(),
            "Expected string at #/items[2], got integer"
        );
    }

    #[test]
    fn schema_message_has_location_suffix() {
        let path = JSONPointer::root().join("properties").join("a");
        let diagnostic = Diagnostic::structural(&path, "Cannot have both 'type' and '$ref'.");
        assert_eq!(
            diagnostic.to_string(),
            "Cannot have both 'type' and '$ref'. (Location: #/properties/a, line/column unknown)"
        );
    }

    #[test]
    fn located_schema_message() {
        let mut diagnostic = Diagnostic::structural(&JSONPointer::root(), "Enum must be an array.");
        diagnostic.position = Some((4, 11));
        assert_eq!(
            diagnostic.to_string(),
            "Enum must be an array. (Line: 4, Column: 11)"
        );
    }

    #[test]
    fn union_mismatch_lists_causes() {
        let diagnostic = Diagnostic::instance(
            &JSONPointer::root(),
            DiagnosticKind::UnionMismatch {
                causes: vec!["a".to_string(), "b".to_string()],
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "Instance at # does not match any type in union: [a; b]"
        );
    }
}
