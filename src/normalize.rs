//! List-block normalization for Markdown handed to an external converter.
//!
//! Converters such as pandoc only recognize a list when it is separated from
//! surrounding paragraphs by a blank line and its markers are followed by a
//! single space. This pass fixes both in one left-to-right sweep. It is a
//! line heuristic, not a Markdown parser: nested lists lose their
//! indentation, and prose lines such as `3.5 kg flour` or `**bold**` are
//! classified as list items.

use std::borrow::Cow;

/// Bullet list markers.
const BULLET_MARKERS: [char; 3] = ['-', '*', '+'];

/// How a single line is classified, judged on its trimmed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Starts with `-`, `*` or `+`. Carries the marker.
    Bullet(char),
    /// Starts with a digit and has a `.` within its first three characters.
    Ordered,
    /// Anything else, blank lines included.
    Text,
}

impl LineKind {
    pub fn is_list_item(self) -> bool {
        !matches!(self, LineKind::Text)
    }
}

/// Whitespace ignored around a line: Unicode whitespace plus the ASCII
/// information separators `\x1c`..=`\x1f`.
fn is_line_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

fn strip(line: &str) -> &str {
    line.trim_matches(is_line_space)
}

fn is_blank(line: &str) -> bool {
    strip(line).is_empty()
}

/// Classify a line. Leading and trailing whitespace is ignored.
///
/// Any Unicode numeric character counts as a digit, so `٣.` and `².` open
/// ordered items just like `3.`.
pub fn classify(line: &str) -> LineKind {
    let trimmed = strip(line);
    match trimmed.chars().next() {
        Some(c) if BULLET_MARKERS.contains(&c) => LineKind::Bullet(c),
        Some(c) if c.is_numeric() && trimmed.chars().take(3).any(|ch| ch == '.') => {
            LineKind::Ordered
        }
        _ => LineKind::Text,
    }
}

/// Whether the normalizer is currently inside a list block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Outside,
    Inside,
}

/// What to emit for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<'a> {
    /// Emit a blank separator line before `line`.
    pub separator: bool,
    pub line: Cow<'a, str>,
}

impl ListState {
    /// Advance the state machine by one input line.
    ///
    /// `previous` is the last line already emitted, if any. A separator is
    /// only requested on a list boundary and only when `previous` exists and
    /// is not blank, so at most one blank line is ever added per boundary.
    pub fn step<'a>(self, line: &'a str, previous: Option<&str>) -> (ListState, Step<'a>) {
        let kind = classify(line);
        let after_content = previous.is_some_and(|p| !is_blank(p));

        let (next, separator) = match (self, kind.is_list_item()) {
            (ListState::Outside, true) => (ListState::Inside, after_content),
            (ListState::Inside, false) if !is_blank(line) => {
                (ListState::Outside, after_content)
            }
            (state, _) => (state, false),
        };

        let line = rewrite_marker(line, kind);
        (next, Step { separator, line })
    }
}

/// Rewrite a list item so its marker is followed by exactly one space.
///
/// Indentation is dropped. Text lines are returned untouched.
fn rewrite_marker(line: &str, kind: LineKind) -> Cow<'_, str> {
    let trimmed = strip(line);
    match kind {
        LineKind::Bullet(marker) => {
            let rest = strip(&trimmed[marker.len_utf8()..]);
            Cow::Owned(format!("{marker} {rest}"))
        }
        LineKind::Ordered => match trimmed.split_once('.') {
            Some((number, rest)) => Cow::Owned(format!("{number}. {}", strip(rest))),
            None => Cow::Borrowed(line),
        },
        LineKind::Text => Cow::Borrowed(line),
    }
}

/// Normalize list formatting in Markdown text.
///
/// Inserts a single blank line between prose and an adjacent list block
/// (in either direction, never at the start of the document) and collapses
/// the whitespace after every list marker to one space. Lines are split on
/// `\n` and joined back the same way, so a trailing newline survives.
/// Normalizing already-normalized text returns it unchanged.
pub fn normalize(text: &str) -> String {
    let mut out: Vec<Cow<'_, str>> = Vec::new();
    let mut state = ListState::Outside;

    for line in text.split('\n') {
        let (next, step) = state.step(line, out.last().map(|l| l.as_ref()));
        if step.separator {
            out.push(Cow::Borrowed(""));
        }
        out.push(step.line);
        state = next;
    }

    out.join("\n")
}
