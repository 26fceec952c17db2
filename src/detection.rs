use std::path::{Path, PathBuf};

use crate::converter::{ConversionWarning, WarningCode};
use crate::format::OutputFormat;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check whether a path names a Markdown source (`.md` or `.markdown`).
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| e == "md" || e == "markdown")
}

/// Output path next to the input, with the extension swapped for the format's.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Decode source bytes to text.
///
/// A UTF-8 BOM is stripped. Bytes that are not valid UTF-8 are decoded as
/// Windows-1252, which never fails, and a warning is returned alongside.
pub fn decode_text(data: &[u8]) -> (String, Option<ConversionWarning>) {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    match std::str::from_utf8(data) {
        Ok(text) => (text.to_string(), None),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(data);
            let warning = ConversionWarning {
                code: WarningCode::LossyDecoding,
                message: "input is not valid UTF-8, decoded as Windows-1252".to_string(),
                location: None,
            };
            (text.into_owned(), Some(warning))
        }
    }
}
