//! Cache of compiled user-supplied patterns.
//!
//! `pattern`, `patternProperties` and `patternKeys` values compile once per
//! validator and are reused across the walk; this is observable only as
//! faster validation.
use ahash::AHashMap;
use fancy_regex::Regex;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct RegexCache {
    compiled: Mutex<AHashMap<String, Arc<Regex>>>,
}

impl RegexCache {
    pub(crate) fn new() -> Self {
        RegexCache::default()
    }

    /// Compiles `pattern`, reusing an earlier compilation when available.
    pub(crate) fn compile(&self, pattern: &str) -> Result<Arc<Regex>, fancy_regex::Error> {
        if let Some(regex) = self.compiled.lock().get(pattern) {
            return Ok(Arc::clone(regex));
        }
        let regex = Arc::new(Regex::new(pattern)?);
        self.compiled
            .lock()
            .insert(pattern.to_string(), Arc::clone(&regex));
        Ok(regex)
    }

    /// Unanchored match, the `re.search` semantics schema patterns use.
    /// Backtracking overruns count as a non-match.
    pub(crate) fn search(&self, pattern: &str, haystack: &str) -> Result<bool, fancy_regex::Error> {
        let regex = self.compile(pattern)?;
        Ok(regex.is_match(haystack).unwrap_or(false))
    }
}
