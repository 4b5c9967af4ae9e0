//! Inline `<mark>` highlighting of titles, excerpts and tag lists.
//!
//! Only the first occurrence of a term in a field is marked. Titles and tags
//! are marked term after term on the same string, so later terms see the
//! markup inserted by earlier ones.

use elbi_core::types::PageRecord;

use crate::text::{find_ignore_case, strip_diacritics};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";
pub const EXCERPT_SEPARATOR: &str = "<hr>";

/// Highlighted fragments for one result entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlights {
    pub title: String,
    pub excerpts: String,
    pub tags: String,
}

impl Highlights {
    pub fn compute(page: &PageRecord, terms: &[String], window: usize) -> Self {
        let mut title = strip_diacritics(&page.title);
        let content = strip_diacritics(&page.content);
        let mut tags = strip_diacritics(&page.tags_json());
        let mut excerpts = String::new();

        for term in terms {
            if let Some(marked) = mark_first(&title, term) {
                title = marked;
            }
            if let Some(snippet) = excerpt(&content, term, window) {
                excerpts.push_str(&snippet);
                excerpts.push_str(EXCERPT_SEPARATOR);
            }
            if let Some(marked) = mark_first(&tags, term) {
                tags = marked;
            }
        }

        Self { title, excerpts, tags }
    }
}

/// `text` with the first case-insensitive occurrence of `term` marked.
pub fn mark_first(text: &str, term: &str) -> Option<String> {
    if term.is_empty() {
        return None;
    }
    let range = find_ignore_case(text, term)?;
    Some(format!(
        "{}{MARK_OPEN}{}{MARK_CLOSE}{}",
        &text[..range.start],
        &text[range.clone()],
        &text[range.end..]
    ))
}

/// Excerpt around the first match of `term`, with the match marked.
///
/// The window is measured on the marked text: it starts `window` characters
/// before the match when more than `window` characters precede it, and at the
/// match otherwise; it ends `window` characters after the match start plus the
/// term, which leaves `window` minus the mark tags' length of trailing
/// context. The end never falls inside the closing tag.
pub fn excerpt(content: &str, term: &str, window: usize) -> Option<String> {
    if term.is_empty() {
        return None;
    }
    let range = find_ignore_case(content, term)?;
    let preceding = content[..range.start].chars().count();
    let start = if preceding > window {
        chars_back(content, range.start, window)
    } else {
        range.start
    };
    let trailing = window.saturating_sub(MARK_OPEN.len() + MARK_CLOSE.len());
    let end = chars_forward(content, range.end, trailing);
    Some(format!(
        "{}{MARK_OPEN}{}{MARK_CLOSE}{}",
        &content[start..range.start],
        &content[range.clone()],
        &content[range.end..end]
    ))
}

fn chars_back(s: &str, from: usize, count: usize) -> usize {
    if count == 0 {
        return from;
    }
    s[..from].char_indices().rev().nth(count - 1).map_or(0, |(i, _)| i)
}

fn chars_forward(s: &str, from: usize, count: usize) -> usize {
    s[from..].char_indices().nth(count).map_or(s.len(), |(i, _)| from + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn marks_only_first_occurrence() {
        assert_eq!(mark_first("echo echo", "echo").unwrap(), "<mark>echo</mark> echo");
        assert_eq!(mark_first("quiet", "loud"), None);
    }

    #[test]
    fn marking_preserves_original_case() {
        assert_eq!(mark_first("Intro", "intro").unwrap(), "<mark>Intro</mark>");
    }

    #[test]
    fn early_match_starts_the_excerpt() {
        let out = excerpt("A cafe in Paris.", "cafe", 200).unwrap();
        assert_eq!(out, "<mark>cafe</mark> in Paris.");
    }

    #[test]
    fn late_match_keeps_leading_context() {
        let content = format!("{}needle{}", "x".repeat(300), "y".repeat(300));
        let out = excerpt(&content, "needle", 200).unwrap();
        // The mark tags take 13 of the trailing characters.
        assert_eq!(out, format!("{}<mark>needle</mark>{}", "x".repeat(200), "y".repeat(187)));
    }

    #[test]
    fn excerpt_window_counts_characters() {
        let content = format!("{}needle{}", "\u{e9}".repeat(20), "\u{fc}".repeat(10));
        let out = excerpt(&content, "needle", 15).unwrap();
        assert_eq!(out, format!("{}<mark>needle</mark>\u{fc}\u{fc}", "\u{e9}".repeat(15)));
    }

    #[test]
    fn small_window_never_cuts_the_mark() {
        assert_eq!(excerpt("abc needle xyz", "needle", 2).unwrap(), "c <mark>needle</mark>");
    }

    #[test]
    fn highlights_strip_diacritics_for_display() {
        let page = PageRecord::new("Café culture", "/cafe/")
            .with_tags(["café", "paris"])
            .with_content("A café in Paris.");
        let h = Highlights::compute(&page, &terms(&["cafe"]), 200);
        assert_eq!(h.title, "<mark>Cafe</mark> culture");
        assert_eq!(h.excerpts, "<mark>cafe</mark> in Paris.<hr>");
        assert_eq!(h.tags, "[\"<mark>cafe</mark>\",\"paris\"]");
    }

    #[test]
    fn excerpts_concatenate_per_term() {
        let page = PageRecord::new("T", "/t/").with_content("one two three");
        let h = Highlights::compute(&page, &terms(&["one", "three"]), 2);
        assert_eq!(h.excerpts, "<mark>one</mark><hr>o <mark>three</mark><hr>");
    }

    #[test]
    fn absent_terms_leave_fields_unmarked() {
        let page = PageRecord::new("Plain", "/p/").with_content("nothing here");
        let h = Highlights::compute(&page, &terms(&["zzz"]), 10);
        assert_eq!(h.title, "Plain");
        assert!(h.excerpts.is_empty());
        assert_eq!(h.tags, "[]");
    }
}
