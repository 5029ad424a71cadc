use crate::error::{Result, UploadError};
use base64::Engine;
use std::path::{Path, PathBuf};

/// Font content read from disk, treated as opaque text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPayload {
    path: PathBuf,
    content: String,
}

impl FontPayload {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Length in characters, the unit partitions are measured in
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Size of the decoded font when the content is standard base64
    pub fn decoded_len(&self) -> Option<usize> {
        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return None;
        }
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .ok()
            .map(|bytes| bytes.len())
    }
}

/// Read the whole font file as text
pub fn load_payload(path: impl AsRef<Path>) -> Result<FontPayload> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| UploadError::io(path, e))?;
    Ok(FontPayload::new(path, content))
}
