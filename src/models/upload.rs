//! Uploaded case documents held in memory for the current session.

use std::path::Path;

use tracing::warn;

/// A user-selected file, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Display name (file name without directories).
    pub name: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
    /// Best-effort MIME type.
    pub mime_type: String,
}

impl UploadedFile {
    /// Create from in-memory content. The MIME type is sniffed from the
    /// bytes first and falls back to the name's extension.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let content = content.into();
        let mime_type = detect_mime(&name, &content);
        Self {
            name,
            content,
            mime_type,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Whether the content looks like text rather than a binary format.
    pub fn is_textual(&self) -> bool {
        self.mime_type.starts_with("text/")
            || self.mime_type == "application/json"
            || self.mime_type == "application/xml"
    }

    /// Textual content, decoded as UTF-8 with replacement characters.
    ///
    /// Binary formats (PDF, DOCX) are not converted; their bytes are decoded
    /// as-is.
    pub fn text(&self) -> String {
        if !self.is_textual() {
            warn!(
                "{} looks like {}, reading raw bytes as text",
                self.name, self.mime_type
            );
        }
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

fn detect_mime(name: &str, content: &[u8]) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.mime_type().to_string();
    }
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "text/plain".to_string())
}
