pub mod pandoc;

use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::format::OutputFormat;

/// Categories for recoverable conversion warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningCode {
    /// Source text was not valid UTF-8 and was decoded with a fallback encoding.
    LossyDecoding,
    /// A directory entry was skipped during folder conversion.
    SkippedEntry,
}

/// A recoverable issue encountered during conversion.
#[derive(Debug, Clone)]
pub struct ConversionWarning {
    pub code: WarningCode,
    pub message: String,
    pub location: Option<String>,
}

/// Options controlling conversion behavior.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Target document format.
    pub format: OutputFormat,
    /// Ask the engine to keep source line wrapping.
    pub preserve_wrap: bool,
    /// Ask the engine to use `#`-style headings.
    pub atx_headings: bool,
    /// Insert a page break between files when combining.
    pub page_breaks: bool,
    /// Prefix each combined file with a heading naming it.
    pub file_headings: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            preserve_wrap: true,
            atx_headings: true,
            page_breaks: true,
            file_headings: true,
        }
    }
}

impl ConversionOptions {
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub(crate) fn engine_request(&self, resource_dirs: Vec<PathBuf>) -> EngineRequest {
        EngineRequest {
            format: self.format,
            preserve_wrap: self.preserve_wrap,
            atx_headings: self.atx_headings,
            resource_dirs,
        }
    }
}

/// The result of converting one document (or one combined document).
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Where the converted document was written.
    pub output: PathBuf,
    /// Recoverable issues encountered during conversion.
    pub warnings: Vec<ConversionWarning>,
}

/// A file that failed during folder conversion.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ConvertError,
}

/// Outcome of converting every Markdown file in a folder.
#[derive(Debug, Default)]
pub struct FolderReport {
    pub converted: Vec<ConversionResult>,
    pub failures: Vec<FileFailure>,
    pub warnings: Vec<ConversionWarning>,
}

impl FolderReport {
    pub fn success_count(&self) -> usize {
        self.converted.len()
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }
}

/// What the engine is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub format: OutputFormat,
    pub preserve_wrap: bool,
    pub atx_headings: bool,
    /// Directories searched for images and other resources linked from the source.
    pub resource_dirs: Vec<PathBuf>,
}

/// External document-conversion engine.
///
/// Implementations read Markdown from `source` and write the requested format
/// to `dest`. The built-in implementation is [`pandoc::Pandoc`]; tests and
/// embedders can supply their own.
pub trait DocumentEngine {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        request: &EngineRequest,
    ) -> Result<(), ConvertError>;
}
