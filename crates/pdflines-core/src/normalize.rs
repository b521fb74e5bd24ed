//! Whitespace normalization and page joining for the document raw text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::page::Page;

/// Marker placed between pages in the raw text.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

static HORIZONTAL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static TRAILING_BEFORE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("valid regex"));
static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Collapse every run of spaces and tabs into a single space.
pub fn collapse_horizontal_whitespace(text: &str) -> Cow<'_, str> {
    HORIZONTAL_RUN.replace_all(text, " ")
}

/// Join pages into one string: lines with `\n`, pages with [`PAGE_SEPARATOR`].
pub fn join_pages(pages: &[Page]) -> String {
    pages
        .iter()
        .map(|page| page.lines.join("\n"))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Canonicalize whitespace.
///
/// In order: runs of spaces/tabs become one space, horizontal whitespace
/// directly before a newline is removed, three or more consecutive newlines
/// become two, and the result is trimmed. Applying this to its own output
/// changes nothing.
pub fn normalize_text(text: &str) -> String {
    let collapsed = HORIZONTAL_RUN.replace_all(text, " ");
    let no_trailing = TRAILING_BEFORE_NEWLINE.replace_all(&collapsed, "\n");
    let paragraphs = NEWLINE_RUN.replace_all(&no_trailing, "\n\n");
    paragraphs.trim().to_string()
}

/// The normalized raw text for a sequence of pages.
pub fn raw_text(pages: &[Page]) -> String {
    normalize_text(&join_pages(pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, lines: &[&str]) -> Page {
        Page::new(number, lines.iter().map(|l| l.to_string()).collect())
    }

    // --- join_pages ---

    #[test]
    fn test_join_pages_empty() {
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn test_join_pages_single_page() {
        assert_eq!(join_pages(&[page(1, &["a", "b"])]), "a\nb");
    }

    #[test]
    fn test_join_pages_separator() {
        let joined = join_pages(&[page(1, &["a"]), page(2, &["b"])]);
        assert_eq!(joined, "a\n\n---\n\nb");
    }

    // --- normalize_text ---

    #[test]
    fn test_normalize_collapses_spaces_and_tabs() {
        assert_eq!(normalize_text("a  b\t\tc \t d"), "a b c d");
    }

    #[test]
    fn test_normalize_strips_trailing_space_before_newline() {
        assert_eq!(normalize_text("a   \nb\t\nc"), "a\nb\nc");
    }

    #[test]
    fn test_normalize_four_newlines_become_two() {
        assert_eq!(normalize_text("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_three_newlines_become_two() {
        assert_eq!(normalize_text("a\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_keeps_double_newline() {
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_text("\n\n  a b  \n\n"), "a b");
    }

    #[test]
    fn test_normalize_spaced_blank_lines_collapse() {
        // Whitespace-only lines between paragraphs still collapse to one blank line.
        assert_eq!(normalize_text("a\n \n \n \nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "a  b \n\n\n\n c\t\td  ",
            "x\n \n\t\n\ny",
            "  lead\n\n---\n\ntrail  ",
            "",
            "plain",
        ];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once, "input: {input:?}");
        }
    }

    // --- raw_text ---

    #[test]
    fn test_raw_text_two_pages() {
        assert_eq!(raw_text(&[page(1, &["A"]), page(2, &["B"])]), "A\n\n---\n\nB");
    }

    #[test]
    fn test_raw_text_single_separator_between_pages() {
        let text = raw_text(&[page(1, &["Sun", "Moon"]), page(2, &["Stars"])]);
        assert_eq!(text.matches("---").count(), 1);
        let sep = text.find(PAGE_SEPARATOR).unwrap();
        assert!(text[..sep].contains("Moon"));
        assert!(text[sep..].contains("Stars"));
    }

    #[test]
    fn test_raw_text_empty_page_in_middle() {
        let text = raw_text(&[page(1, &["A"]), page(2, &[]), page(3, &["C"])]);
        assert_eq!(text, "A\n\n---\n\n---\n\nC");
    }
}
