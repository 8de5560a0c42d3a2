//! `$import` / `$importdefs` expansion.
//!
//! Runs before either validation stage. The walk replaces import keywords
//! with the fetched definitions in place, so later pointer resolution sees
//! the imported names as if they were defined locally.
use crate::{
    error::{Diagnostic, DiagnosticKind},
    paths::JSONPointer,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::{fs::File, io::BufReader, path::PathBuf};

lazy_static! {
    pub(crate) static ref ABSOLUTE_URI_RE: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+\-.]*://").expect("Is a valid regex");
}

/// Why an import could not be resolved.
#[derive(Debug)]
pub enum ImportError {
    /// The resolver has no source for this URI.
    Unavailable,
    /// The resolver found a source but failed to produce a document from it.
    Load {
        /// File path or URL the resolver tried.
        source: String,
        /// Underlying I/O, HTTP or parse error.
        reason: String,
    },
}

/// Produces external schema documents during import expansion.
///
/// Injected by the caller; the validator itself performs no I/O outside of
/// this trait.
pub trait ResolveImport: Send + Sync {
    /// Fetches the document identified by `uri`.
    fn fetch(&self, uri: &str) -> Result<Value, ImportError>;
}

/// The default resolver: a URI to local-file mapping.
#[derive(Debug, Default)]
pub struct FileMapResolver {
    map: ahash::AHashMap<String, PathBuf>,
}

impl FileMapResolver {
    /// An empty mapping; every fetch fails as unavailable.
    #[must_use]
    pub fn new() -> Self {
        FileMapResolver::default()
    }

    /// Maps `uri` to a local file.
    pub fn insert(&mut self, uri: impl Into<String>, path: impl Into<PathBuf>) {
        self.map.insert(uri.into(), path.into());
    }
}

impl ResolveImport for FileMapResolver {
    fn fetch(&self, uri: &str) -> Result<Value, ImportError> {
        let path = self.map.get(uri).ok_or(ImportError::Unavailable)?;
        let load = |path: &PathBuf| -> Result<Value, String> {
            let file = File::open(path).map_err(|error| error.to_string())?;
            serde_json::from_reader(BufReader::new(file)).map_err(|error| error.to_string())
        };
        load(path).map_err(|reason| ImportError::Load {
            source: path.display().to_string(),
            reason,
        })
    }
}

/// Fetches external schemas over HTTP(S).
#[cfg(feature = "reqwest")]
#[derive(Debug, Default)]
pub struct HttpResolver;

#[cfg(feature = "reqwest")]
impl ResolveImport for HttpResolver {
    fn fetch(&self, uri: &str) -> Result<Value, ImportError> {
        let fetch = || -> Result<Value, reqwest::Error> {
            reqwest::blocking::get(uri)?.json()
        };
        fetch().map_err(|error| ImportError::Load {
            source: uri.to_string(),
            reason: error.to_string(),
        })
    }
}

/// Walks the schema tree depth-first and expands `$import`/`$importdefs`.
///
/// When `allow_import` is off, each encountered keyword is diagnosed and left
/// in place. Import failures are diagnosed and expansion continues without
/// the external names.
pub(crate) fn process_imports(
    value: &mut Value,
    path: &JSONPointer,
    allow_import: bool,
    resolver: &dyn ResolveImport,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        Value::Object(object) => {
            for keyword in &["$import", "$importdefs"] {
                if object.contains_key(*keyword) {
                    expand_one(object, *keyword, path, allow_import, resolver, diagnostics);
                }
            }
            for (key, child) in object.iter_mut() {
                process_imports(
                    child,
                    &path.join(key.as_str()),
                    allow_import,
                    resolver,
                    diagnostics,
                );
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                process_imports(item, &path.join(index), allow_import, resolver, diagnostics);
            }
        }
        _ => {}
    }
}

fn expand_one(
    object: &mut Map<String, Value>,
    keyword: &'static str,
    path: &JSONPointer,
    allow_import: bool,
    resolver: &dyn ResolveImport,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let location = path.join(keyword);
    if !allow_import {
        diagnostics.push(Diagnostic::schema(
            &location,
            DiagnosticKind::ImportDisabled {
                keyword: keyword.to_string(),
            },
        ));
        return;
    }
    let uri = match object.get(keyword) {
        Some(Value::String(uri)) => uri.clone(),
        Some(_) => {
            diagnostics.push(Diagnostic::schema(
                &location,
                DiagnosticKind::ImportValueInvalid {
                    keyword: keyword.to_string(),
                    expected: "a string URI",
                },
            ));
            return;
        }
        None => return,
    };
    if !ABSOLUTE_URI_RE.is_match(&uri) {
        diagnostics.push(Diagnostic::schema(
            &location,
            DiagnosticKind::ImportValueInvalid {
                keyword: keyword.to_string(),
                expected: "an absolute URI",
            },
        ));
        return;
    }
    let external = match resolver.fetch(&uri) {
        Ok(external) => external,
        Err(error) => {
            if let ImportError::Load { source, reason } = error {
                diagnostics.push(Diagnostic::schema(
                    &location,
                    DiagnosticKind::ImportLoadFailed {
                        path: source,
                        reason,
                    },
                ));
            }
            diagnostics.push(Diagnostic::schema(
                &location,
                DiagnosticKind::ImportFetchFailed { uri },
            ));
            return;
        }
    };
    let mut imported = Map::new();
    if keyword == "$import" {
        if let (Some(Value::String(name)), true) =
            (external.get("name"), external.get("type").is_some())
        {
            imported.insert(name.clone(), external.clone());
        }
    }
    if let Some(Value::Object(definitions)) = external.get("definitions") {
        for (name, definition) in definitions {
            imported.insert(name.clone(), definition.clone());
        }
    }
    for (name, definition) in imported {
        if !object.contains_key(&name) {
            object.insert(name, definition);
        }
    }
    object.remove(keyword);
}

#[cfg(test)]
mod tests {
    use super::{process_imports, ImportError, ResolveImport};
    use crate::paths::JSONPointer;
    use serde_json::{json, Value};

    struct StaticResolver(Value);

    impl ResolveImport for StaticResolver {
        fn fetch(&self, uri: &str) -> Result<Value, ImportError> {
            self.0
                .get(uri)
                .cloned()
                .ok_or(ImportError::Unavailable)
        }
    }

    fn expand(schema: &mut Value, resolver: &StaticResolver) -> Vec<String> {
        let mut diagnostics = Vec::new();
        process_imports(
            schema,
            &JSONPointer::root(),
            true,
            resolver,
            &mut diagnostics,
        );
        diagnostics.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn import_inlines_named_root_and_definitions() {
        let resolver = StaticResolver(json!({
            "https://example.com/person": {
                "name": "Person",
                "type": "object",
                "properties": {"firstName": {"type": "string"}},
                "definitions": {"Address": {"name": "Address", "type": "string"}}
            }
        }));
        let mut schema = json!({"definitions": {"People": {"$import": "https://example.com/person"}}});
        let diagnostics = expand(&mut schema, &resolver);
        assert!(diagnostics.is_empty());
        let people = &schema["definitions"]["People"];
        assert!(people.get("$import").is_none());
        assert_eq!(people["Person"]["type"], "object");
        assert_eq!(people["Address"]["type"], "string");
    }

    #[test]
    fn importdefs_merges_only_definitions() {
        let resolver = StaticResolver(json!({
            "https://example.com/defs": {
                "name": "Ignored",
                "type": "object",
                "definitions": {"LibraryType": {"name": "LibraryType", "type": "string"}}
            }
        }));
        let mut schema = json!({"definitions": {"Lib": {"$importdefs": "https://example.com/defs"}}});
        let diagnostics = expand(&mut schema, &resolver);
        assert!(diagnostics.is_empty());
        let lib = &schema["definitions"]["Lib"];
        assert!(lib.get("Ignored").is_none());
        assert_eq!(lib["LibraryType"]["type"], "string");
    }

    #[test]
    fn merge_does_not_clobber_local_names() {
        let resolver = StaticResolver(json!({
            "https://example.com/defs": {
                "definitions": {"Kept": {"type": "string"}}
            }
        }));
        let mut schema = json!({
            "Kept": {"type": "number"},
            "$importdefs": "https://example.com/defs"
        });
        expand(&mut schema, &resolver);
        assert_eq!(schema["Kept"]["type"], "number");
    }

    #[test]
    fn unfetchable_uri_is_diagnosed() {
        let resolver = StaticResolver(json!({}));
        let mut schema = json!({"$import": "https://example.com/missing"});
        let diagnostics = expand(&mut schema, &resolver);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("Unable to fetch external schema"));
        // The unresolved keyword is consumed only on success.
        assert!(schema.get("$import").is_some());
    }

    #[test]
    fn relative_uri_is_diagnosed() {
        let resolver = StaticResolver(json!({}));
        let mut schema = json!({"$import": "people.json"});
        let diagnostics = expand(&mut schema, &resolver);
        assert!(diagnostics[0].contains("must be an absolute URI"));
    }

    #[test]
    fn disabled_imports_are_diagnosed_and_left_alone() {
        let mut schema = json!({"$import": "https://example.com/person"});
        let mut diagnostics = Vec::new();
        process_imports(
            &mut schema,
            &JSONPointer::root(),
            false,
            &StaticResolver(json!({})),
            &mut diagnostics,
        );
        assert!(diagnostics[0]
            .to_string()
            .contains("allow_import not enabled"));
        assert!(schema.get("$import").is_some());
    }

    #[test]
    fn nested_imports_expand() {
        let resolver = StaticResolver(json!({
            "https://example.com/outer": {
                "definitions": {
                    "Inner": {"$importdefs": "https://example.com/inner"}
                }
            },
            "https://example.com/inner": {
                "definitions": {"Leaf": {"type": "string"}}
            }
        }));
        let mut schema = json!({"$importdefs": "https://example.com/outer"});
        let diagnostics = expand(&mut schema, &resolver);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(schema["Inner"]["Leaf"]["type"], "string");
    }
}
