use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConvertError;

/// Target document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Docx,
    Pdf,
    Html,
    Odt,
    Rtf,
    Tex,
    Epub,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::Docx,
        OutputFormat::Pdf,
        OutputFormat::Html,
        OutputFormat::Odt,
        OutputFormat::Rtf,
        OutputFormat::Tex,
        OutputFormat::Epub,
    ];

    /// File extension for this format, without a dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
            OutputFormat::Odt => "odt",
            OutputFormat::Rtf => "rtf",
            OutputFormat::Tex => "tex",
            OutputFormat::Epub => "epub",
        }
    }

    /// Writer name passed to pandoc's `--to`.
    pub fn pandoc_writer(self) -> &'static str {
        match self {
            OutputFormat::Tex => "latex",
            other => other.extension(),
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                format: path.display().to_string(),
            })?;
        ext.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match name.as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            "html" | "htm" => Ok(OutputFormat::Html),
            "odt" => Ok(OutputFormat::Odt),
            "rtf" => Ok(OutputFormat::Rtf),
            "tex" | "latex" => Ok(OutputFormat::Tex),
            "epub" => Ok(OutputFormat::Epub),
            _ => Err(ConvertError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_all_extensions() {
        for format in OutputFormat::ALL {
            assert_eq!(format.extension().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_parse_case_insensitive_and_dotted() {
        assert_eq!("DOCX".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert_eq!(".pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("LaTeX".parse::<OutputFormat>().unwrap(), OutputFormat::Tex);
    }

    #[test]
    fn test_parse_unknown_format() {
        let err = "pptx".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat { ref format } if format == "pptx"));
    }

    #[test]
    fn test_from_path() {
        let path = PathBuf::from("out/report.HTM");
        assert_eq!(OutputFormat::from_path(&path).unwrap(), OutputFormat::Html);
        let path = PathBuf::from("book.epub");
        assert_eq!(OutputFormat::from_path(&path).unwrap(), OutputFormat::Epub);
    }

    #[test]
    fn test_from_path_without_extension() {
        assert!(OutputFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_pandoc_writer_names() {
        assert_eq!(OutputFormat::Tex.pandoc_writer(), "latex");
        assert_eq!(OutputFormat::Docx.pandoc_writer(), "docx");
        assert_eq!(OutputFormat::Pdf.pandoc_writer(), "pdf");
    }

    #[test]
    fn test_display_is_extension() {
        assert_eq!(OutputFormat::Odt.to_string(), "odt");
        assert_eq!(OutputFormat::default(), OutputFormat::Docx);
    }
}
