//! Type-name classification for schema `type` tags.

/// Is `name` one of the primitive type names?
pub(crate) fn is_primitive(name: &str) -> bool {
    matches!(
        name,
        "any"
            | "string"
            | "number"
            | "boolean"
            | "null"
            | "int8"
            | "uint8"
            | "int16"
            | "uint16"
            | "int32"
            | "uint32"
            | "int64"
            | "uint64"
            | "int128"
            | "uint128"
            | "float8"
            | "float"
            | "double"
            | "decimal"
            | "date"
            | "datetime"
            | "time"
            | "duration"
            | "uuid"
            | "uri"
            | "binary"
            | "jsonpointer"
    )
}

/// Is `name` one of the compound type names?
pub(crate) fn is_compound(name: &str) -> bool {
    matches!(
        name,
        "object" | "array" | "set" | "map" | "tuple" | "choice"
    )
}

/// Is `name` a numeric type for the purpose of validation-addin gating?
pub(crate) fn is_numeric(name: &str) -> bool {
    matches!(
        name,
        "number"
            | "integer"
            | "float"
            | "double"
            | "decimal"
            | "float8"
            | "int8"
            | "uint8"
            | "int16"
            | "uint16"
            | "int32"
            | "uint32"
            | "int64"
            | "uint64"
            | "int128"
            | "uint128"
    )
}

/// Numeric types whose instances are carried as JSON strings.
pub(crate) fn is_string_backed_numeric(name: &str) -> bool {
    matches!(name, "int64" | "uint64" | "int128" | "uint128" | "decimal")
}
