//! Facilities for working with paths within schema documents or validated instances.
use serde::Serialize;
use std::fmt;

/// A path inside a schema document or an instance, rendered in the
/// `#/segment/segment[index]` form used by diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct JSONPointer(Vec<PathChunk>);

impl JSONPointer {
    /// Pointer to the document root (`#`).
    pub(crate) fn root() -> Self {
        JSONPointer(Vec::new())
    }

    /// A new pointer with `chunk` appended.
    pub(crate) fn join(&self, chunk: impl Into<PathChunk>) -> Self {
        let mut chunks = self.0.clone();
        chunks.push(chunk.into());
        JSONPointer(chunks)
    }

    /// Path components, each cast to `String`.
    pub fn into_vec(self) -> Vec<String> {
        self.0
            .iter()
            .map(|chunk| match chunk {
                PathChunk::Name(value) => value.clone(),
                PathChunk::Index(idx) => idx.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for JSONPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for chunk in &self.0 {
            match chunk {
                PathChunk::Name(value) => {
                    f.write_str("/")?;
                    f.write_str(value)?;
                }
                PathChunk::Index(idx) => {
                    f.write_str("[")?;
                    itoa::fmt(&mut *f, *idx)?;
                    f.write_str("]")?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) enum PathChunk {
    Name(String),
    Index(usize),
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Name(value)
    }
}
impl From<&str> for PathChunk {
    #[inline]
    fn from(value: &str) -> Self {
        PathChunk::Name(value.to_string())
    }
}
impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}
