//! Query tokenizing.
//!
//! A term is a run of adjacent pieces, each piece being either a
//! double-quoted span closed on the same line or a run of characters that are
//! neither whitespace nor `"`. Whitespace separates terms and an unmatched
//! quote is skipped. Quotes are removed from the finished term.

use crate::text::strip_diacritics;

/// Splits a raw query into diacritic-stripped terms, dropping empty ones.
pub fn parse_terms(raw: &str) -> Vec<String> {
    let normalized = strip_diacritics(raw);
    let chars: Vec<char> = normalized.chars().collect();
    let mut terms = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let mut term = String::new();
        while let Some(next) = piece_end(&chars, i) {
            term.extend(chars[i..next].iter().filter(|c| **c != '"'));
            i = next;
        }
        if !term.is_empty() {
            terms.push(term);
        }
        if piece_end(&chars, i).is_none() {
            i += 1;
        }
    }
    terms
}

/// End index of the piece starting at `start`, if one starts there.
fn piece_end(chars: &[char], start: usize) -> Option<usize> {
    let first = *chars.get(start)?;
    if first == '"' {
        chars[start + 1..]
            .iter()
            .take_while(|c| **c != '\n')
            .position(|c| *c == '"')
            .map(|offset| start + offset + 2)
    } else if first.is_whitespace() {
        None
    } else {
        let len = chars[start..]
            .iter()
            .take_while(|c| !c.is_whitespace() && **c != '"')
            .count();
        Some(start + len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(parse_terms("  rust   search "), vec!["rust", "search"]);
    }

    #[test]
    fn quoted_phrase_is_one_term() {
        assert_eq!(parse_terms("\"foo bar\""), vec!["foo bar"]);
        assert_eq!(parse_terms("x \"foo bar\" y"), vec!["x", "foo bar", "y"]);
    }

    #[test]
    fn adjacent_pieces_join() {
        assert_eq!(parse_terms("foo\"bar baz\""), vec!["foobar baz"]);
    }

    #[test]
    fn unmatched_quote_is_skipped() {
        assert_eq!(parse_terms("foo \"bar"), vec!["foo", "bar"]);
    }

    #[test]
    fn empty_quotes_and_blank_input_yield_nothing() {
        assert!(parse_terms("\"\"").is_empty());
        assert!(parse_terms("   ").is_empty());
    }

    #[test]
    fn diacritics_are_removed_but_case_is_kept() {
        assert_eq!(parse_terms("Café"), vec!["Cafe"]);
    }
}
