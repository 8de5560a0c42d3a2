//! Configuration of a validation run.
use crate::{
    error::Diagnostic,
    imports::{process_imports, FileMapResolver, ResolveImport},
    instance::InstanceValidator,
    paths::JSONPointer,
    schema::SchemaValidator,
    source,
};
use serde_json::Value;
use std::{fmt, path::PathBuf, sync::Arc};

/// Full configuration to guide schema and instance validation.
///
/// Example of usage:
/// ```rust
/// # use jsonstructure::ValidationOptions;
/// # use serde_json::json;
/// let mut schema = json!({
///     "$schema": "https://json-structure.org/meta/validation/v0/#",
///     "$id": "https://example.com/schema",
///     "name": "Price",
///     "type": "number",
///     "minimum": 0
/// });
/// let diagnostics = ValidationOptions::new()
///     .with_extended()
///     .validate_schema(&mut schema, None);
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Default)]
pub struct ValidationOptions {
    allow_dollar: bool,
    allow_import: bool,
    extended: bool,
    import_map: FileMapResolver,
    resolver: Option<Arc<dyn ResolveImport>>,
}

impl ValidationOptions {
    /// A default configuration: plain identifiers, no imports, core-only
    /// keyword processing.
    #[must_use]
    pub fn new() -> Self {
        ValidationOptions::default()
    }

    /// Admit `$` in identifiers, for validating meta-schema documents
    /// themselves.
    pub fn with_metaschema_identifiers(&mut self) -> &mut Self {
        self.allow_dollar = true;
        self
    }

    /// Enable `$import` / `$importdefs` expansion.
    pub fn with_imports(&mut self) -> &mut Self {
        self.allow_import = true;
        self
    }

    /// Enable conditional-composition and validation keyword processing in
    /// the schema validator.
    pub fn with_extended(&mut self) -> &mut Self {
        self.extended = true;
        self
    }

    /// Map `uri` to a local file for the default import resolver.
    pub fn with_import_map(&mut self, uri: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.import_map.insert(uri, path);
        self
    }

    /// Replace the import resolver entirely.
    pub fn with_resolver(&mut self, resolver: Arc<dyn ResolveImport>) -> &mut Self {
        self.resolver = Some(resolver);
        self
    }

    fn resolver(&self) -> &dyn ResolveImport {
        match &self.resolver {
            Some(resolver) => resolver.as_ref(),
            None => &self.import_map,
        }
    }

    /// Validates a schema document against the meta-schema.
    ///
    /// Import expansion rewrites `doc` in place first, so that pointer
    /// resolution sees imported definitions; passing the original source
    /// text enables line/column positions in the diagnostics.
    pub fn validate_schema(&self, doc: &mut Value, source_text: Option<&str>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        process_imports(
            doc,
            &JSONPointer::root(),
            self.allow_import,
            self.resolver(),
            &mut diagnostics,
        );
        diagnostics.extend(SchemaValidator::new(doc, self.allow_dollar, self.extended).validate());
        if let Some(source) = source_text {
            source::attach_positions(&mut diagnostics, source);
        }
        diagnostics
    }

    /// Builds an [`InstanceValidator`] around `root_schema` (imports
    /// expanded eagerly when enabled).
    #[must_use]
    pub fn instance_validator(&self, root_schema: Value) -> InstanceValidator {
        InstanceValidator::build(root_schema, self.allow_import, self.resolver())
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("allow_dollar", &self.allow_dollar)
            .field("allow_import", &self.allow_import)
            .field("extended", &self.extended)
            .finish()
    }
}
