//! Heuristic mapping of diagnostic locations back to the source text.
use crate::error::Diagnostic;
use memchr::{memchr_iter, memmem, memrchr};

/// Finds the first occurrence of the pointer's segments in the source text
/// and returns a 1-based `(line, column)` pair.
///
/// Each `/`-separated segment is searched as a quoted member name, resuming
/// after the previous hit, so nested members resolve to their innermost
/// occurrence. Bracketed indices are part of the preceding segment and make
/// the lookup fail, which callers treat as "position unknown".
pub(crate) fn locate(source: &str, pointer: &str) -> Option<(usize, usize)> {
    let rest = pointer.strip_prefix('#')?;
    if rest.is_empty() {
        return None;
    }
    let bytes = source.as_bytes();
    let mut position = 0;
    for segment in rest.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        let quoted = format!("\"{}\"", segment);
        let found = memmem::find(&bytes[position..], quoted.as_bytes())?;
        position += found + quoted.len();
    }
    let line = memchr_iter(b'\n', &bytes[..position]).count() + 1;
    let column = match memrchr(b'\n', &bytes[..position]) {
        Some(newline) => position - newline,
        None => position + 1,
    };
    Some((line, column))
}

/// Fills in `position` for every schema diagnostic whose location occurs in
/// the source text.
pub(crate) fn attach_positions(diagnostics: &mut [Diagnostic], source: &str) {
    for diagnostic in diagnostics {
        if diagnostic.position.is_none() {
            diagnostic.position = locate(source, &diagnostic.location.to_string());
        }
    }
}
