use crate::converter::ConversionOptions;
use crate::normalize::normalize;

/// Raw LaTeX page break; pandoc passes it through to formats that support it.
pub const PAGE_BREAK: &str = "\\pagebreak";

/// One source document taking part in a combined conversion.
#[derive(Debug, Clone, Copy)]
pub struct CombineSource<'a> {
    /// Heading text used when `file_headings` is enabled, usually the file stem.
    pub title: &'a str,
    /// Raw Markdown, normalized before it is appended.
    pub text: &'a str,
}

/// Format a Markdown heading at the given level (clamped to 1..=6).
pub fn format_heading(level: u8, text: &str) -> String {
    let level = level.clamp(1, 6);
    let hashes = "#".repeat(level as usize);
    format!("{} {}\n", hashes, text)
}

/// Concatenate several documents into one Markdown text.
///
/// Each document is list-normalized on its own. Documents after the first are
/// preceded by a page break when `page_breaks` is set, and every document is
/// introduced by a level-1 heading with its title when `file_headings` is set.
pub fn combine_documents(sources: &[CombineSource<'_>], options: &ConversionOptions) -> String {
    let mut out = String::new();

    for (i, source) in sources.iter().enumerate() {
        if i > 0 && options.page_breaks {
            out.push_str("\n\n");
            out.push_str(PAGE_BREAK);
            out.push_str("\n\n");
        }
        if options.file_headings {
            out.push_str(&format_heading(1, source.title));
            out.push('\n');
        }
        out.push_str(&normalize(source.text));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src<'a>(title: &'a str, text: &'a str) -> CombineSource<'a> {
        CombineSource { title, text }
    }

    #[test]
    fn test_format_heading_levels() {
        assert_eq!(format_heading(1, "Title"), "# Title\n");
        assert_eq!(format_heading(3, "H3"), "### H3\n");
    }

    #[test]
    fn test_format_heading_clamped() {
        assert_eq!(format_heading(0, "Zero"), "# Zero\n");
        assert_eq!(format_heading(9, "Nine"), "###### Nine\n");
    }

    #[test]
    fn test_combine_single_document() {
        let out = combine_documents(&[src("intro", "Hello\n- a")], &ConversionOptions::default());
        assert_eq!(out, "# intro\n\nHello\n\n- a");
    }

    #[test]
    fn test_combine_inserts_page_breaks_between_documents() {
        let out = combine_documents(
            &[src("one", "First."), src("two", "Second.")],
            &ConversionOptions::default(),
        );
        assert_eq!(out, "# one\n\nFirst.\n\n\\pagebreak\n\n# two\n\nSecond.");
    }

    #[test]
    fn test_combine_normalizes_each_document() {
        let out = combine_documents(
            &[src("a", "x\n-   y"), src("b", "1.z")],
            &ConversionOptions::default(),
        );
        assert!(out.contains("x\n\n- y"));
        assert!(out.contains("# b\n\n1. z"));
    }

    #[test]
    fn test_combine_without_breaks_or_headings() {
        let options = ConversionOptions {
            page_breaks: false,
            file_headings: false,
            ..Default::default()
        };
        let out = combine_documents(&[src("a", "one\n"), src("b", "two")], &options);
        assert_eq!(out, "one\ntwo");
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine_documents(&[], &ConversionOptions::default()), "");
    }
}
