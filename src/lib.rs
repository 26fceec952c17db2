pub mod converter;
pub mod detection;
pub mod error;
pub mod format;
pub mod markdown;
pub mod normalize;
pub mod staging;

pub use converter::pandoc;
pub use converter::{
    ConversionOptions, ConversionResult, ConversionWarning, DocumentEngine, EngineRequest,
    FileFailure, FolderReport, WarningCode,
};
pub use error::ConvertError;
pub use format::OutputFormat;
pub use normalize::normalize;

use std::path::{Path, PathBuf};

use markdown::CombineSource;
use staging::StagingFile;

/// Convert one Markdown file with the given engine.
///
/// The source is decoded, list-normalized, staged in a temporary file and
/// handed to `engine`. When `output` is `None` the result is written next to
/// the input with the format's extension. The staging file is removed before
/// this function returns, on success and on error.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    options: &ConversionOptions,
    engine: &dyn DocumentEngine,
) -> Result<ConversionResult, ConvertError> {
    let input = input.as_ref();
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| detection::default_output_path(input, options.format));

    let (text, mut warnings) = read_source(input)?;
    let staged = StagingFile::create(&file_label(input), &normalize(&text))?;

    ensure_parent_dir(&output)?;
    let request = options.engine_request(resource_dirs([input]));
    engine.convert(staged.path(), &output, &request)?;

    tracing::debug!(input = %input.display(), output = %output.display(), "converted");
    for w in &mut warnings {
        w.location.get_or_insert_with(|| input.display().to_string());
    }
    Ok(ConversionResult { output, warnings })
}

/// Convert every Markdown file directly inside `input_dir`.
///
/// Files are processed in name order and written to `output_dir` (default:
/// `input_dir`, created if missing) as `<stem>.<ext>`. A failing file is
/// recorded in the report and does not stop the batch; only an unreadable
/// input directory or an uncreatable output directory fails the whole call.
pub fn convert_folder(
    input_dir: impl AsRef<Path>,
    output_dir: Option<&Path>,
    options: &ConversionOptions,
    engine: &dyn DocumentEngine,
) -> Result<FolderReport, ConvertError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.unwrap_or(input_dir);

    let entries = std::fs::read_dir(input_dir).map_err(|e| ConvertError::Read {
        path: input_dir.to_path_buf(),
        source: e,
    })?;
    std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::Write {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut report = FolderReport::default();
    let mut sources = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && detection::is_markdown_path(&path) {
                    sources.push(path);
                }
            }
            Err(e) => report.warnings.push(ConversionWarning {
                code: WarningCode::SkippedEntry,
                message: format!("unreadable directory entry: {e}"),
                location: Some(input_dir.display().to_string()),
            }),
        }
    }
    sources.sort();

    for path in sources {
        let Some(name) = path.file_name() else {
            continue;
        };
        let output = output_dir
            .join(name)
            .with_extension(options.format.extension());
        match convert_file(&path, Some(&output), options, engine) {
            Ok(result) => report.converted.push(result),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "conversion failed");
                report.failures.push(FileFailure { path, error });
            }
        }
    }

    Ok(report)
}

/// Combine several Markdown files into one document and convert it.
///
/// Each file is normalized separately, headed by its file stem and separated
/// from the previous one by a page break (see [`ConversionOptions`]). Any
/// unreadable input fails the whole call.
pub fn combine_files<P: AsRef<Path>>(
    inputs: &[P],
    output: &Path,
    options: &ConversionOptions,
    engine: &dyn DocumentEngine,
) -> Result<ConversionResult, ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::NoInputs);
    }

    let mut warnings = Vec::new();
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        let input = input.as_ref();
        let (text, file_warnings) = read_source(input)?;
        warnings.extend(file_warnings.into_iter().map(|mut w| {
            w.location.get_or_insert_with(|| input.display().to_string());
            w
        }));
        documents.push((file_title(input), text));
    }

    let sources: Vec<CombineSource<'_>> = documents
        .iter()
        .map(|(title, text)| CombineSource { title, text })
        .collect();
    let combined = markdown::combine_documents(&sources, options);
    let staged = StagingFile::create("combined", &combined)?;

    ensure_parent_dir(output)?;
    let request = options.engine_request(resource_dirs(inputs.iter().map(|p| p.as_ref())));
    engine.convert(staged.path(), output, &request)?;

    tracing::debug!(files = inputs.len(), output = %output.display(), "combined");
    Ok(ConversionResult {
        output: output.to_path_buf(),
        warnings,
    })
}

/// Read and decode a source file.
fn read_source(path: &Path) -> Result<(String, Vec<ConversionWarning>), ConvertError> {
    let data = std::fs::read(path).map_err(|e| ConvertError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let (text, warning) = detection::decode_text(&data);
    Ok((text, warning.into_iter().collect()))
}

fn ensure_parent_dir(output: &Path) -> Result<(), ConvertError> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Distinct parent directories of the inputs, in first-seen order.
///
/// The staged copy lives in the temp dir, so the engine needs these to resolve
/// relative image links.
fn resource_dirs<'a>(inputs: impl IntoIterator<Item = &'a Path>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for input in inputs {
        let dir = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_label(path: &Path) -> String {
    let title = file_title(path);
    if title.is_empty() {
        "input".to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_dirs_dedup_and_default() {
        let dirs = resource_dirs([
            Path::new("docs/a.md"),
            Path::new("docs/b.md"),
            Path::new("c.md"),
        ]);
        assert_eq!(dirs, vec![PathBuf::from("docs"), PathBuf::from(".")]);
    }

    #[test]
    fn test_file_title_and_label() {
        assert_eq!(file_title(Path::new("dir/Chapter 1.md")), "Chapter 1");
        assert_eq!(file_label(Path::new("")), "input");
    }

    #[test]
    fn test_ensure_parent_dir_accepts_bare_file_name() {
        assert!(ensure_parent_dir(Path::new("out.docx")).is_ok());
    }
}
