use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ConvertError;

/// Normalized Markdown written to a temporary file for the engine to read.
///
/// The file lives in the system temp directory and is removed when the value
/// is dropped, whether the conversion succeeded, failed, or panicked.
#[derive(Debug)]
pub struct StagingFile {
    file: NamedTempFile,
}

impl StagingFile {
    /// Stage `text` in a new file named `mdconvert-<label>-XXXXXX.md`.
    pub fn create(label: &str, text: &str) -> Result<Self, ConvertError> {
        let prefix = format!("mdconvert-{}-", sanitize_label(label));
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".md")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), bytes = text.len(), "staged markdown");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Keep labels filesystem-safe and short.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .take(32)
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
