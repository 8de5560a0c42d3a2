//! Lexical JSON pointer resolution against the root schema document.
use serde_json::Value;

/// Resolves a `#/a/b`-style pointer against `root`.
///
/// Segments are unescaped (`~1` to `/`, then `~0` to `~`) and traversed
/// through objects only; a segment landing on a non-object yields `None`.
/// The bare pointer `#` returns the root, and empty segments are skipped.
pub(crate) fn resolve<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let rest = pointer.strip_prefix('#')?;
    let mut target = root;
    for segment in rest.split('/') {
        if segment.is_empty() {
            continue;
        }
        let segment = unescape(segment);
        target = target.as_object()?.get(segment.as_ref())?;
    }
    Some(target)
}

/// The segment that makes `resolve` fail, along with whether the failure was
/// a missing key or a non-object intermediate. Used by the schema validator,
/// which reports which segment broke.
pub(crate) enum PointerError {
    NotFound(String),
    NotAnObject(String),
}

pub(crate) fn check<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, PointerError> {
    let rest = match pointer.strip_prefix('#') {
        Some(rest) => rest,
        None => return Err(PointerError::NotFound(pointer.to_string())),
    };
    let mut target = root;
    for segment in rest.split('/') {
        if segment.is_empty() {
            continue;
        }
        let segment = unescape(segment);
        match target.as_object() {
            Some(object) => match object.get(segment.as_ref()) {
                Some(next) => target = next,
                None => return Err(PointerError::NotFound(segment.into_owned())),
            },
            None => return Err(PointerError::NotAnObject(segment.into_owned())),
        }
    }
    Ok(target)
}

fn unescape(segment: &str) -> std::borrow::Cow<'_, str> {
    if segment.contains('~') {
        std::borrow::Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        std::borrow::Cow::Borrowed(segment)
    }
}
