use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// NFD-decomposes `s` and drops combining diacritical marks.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Diacritic-stripped, lower-cased form used for every comparison.
pub fn fold(s: &str) -> String {
    strip_diacritics(s).to_lowercase()
}

/// Byte range of the first case-insensitive occurrence of `needle`.
///
/// The range always lies on char boundaries of `haystack`, even where
/// lower-casing changes the length of a character.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Some(0..0);
    }
    haystack
        .char_indices()
        .find_map(|(start, _)| match_at(&haystack[start..], &needle).map(|len| start..start + len))
}

fn match_at(rest: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in rest.char_indices() {
        for lower in ch.to_lowercase() {
            if matched == needle.len() || needle[matched] != lower {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}
