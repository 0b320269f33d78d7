use std::path::Path;

use crate::error::AiError;

/// A source document sent to the model alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    #[must_use]
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: "application/pdf".to_string(),
            bytes,
        }
    }

    /// Read a PDF from disk.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Io`] if the file cannot be read.
    pub async fn read_pdf(path: &Path) -> Result<Self, AiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| AiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read document");
        Ok(Self::pdf(name, bytes))
    }
}
