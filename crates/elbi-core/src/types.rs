//! Domain types used by the search filter and the diagram renderer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One entry of the page index emitted by the site generator.
///
/// - `title`: page title as displayed in results
/// - `relpermalink`: site-relative link, e.g. `/01-intro/`
/// - `tags`/`categories`: taxonomy terms in generator order
/// - `content`: plain-text body
/// - `extra`: any other fields the generator emitted, kept verbatim so
///   that [`PageRecord::full_text_dump`] covers the whole record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub relpermalink: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PageRecord {
    pub fn new(title: impl Into<String>, relpermalink: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            relpermalink: relpermalink.into(),
            tags: Vec::new(),
            categories: Vec::new(),
            content: String::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Compact JSON of the record as a search pass sees it: every field, keys
    /// included, followed by the pass fields `score` (0), `toSearchResult`
    /// (false) and `chapter` (`null` when absent).
    pub fn full_text_dump(&self) -> String {
        let view = PassView { page: self, score: 0, to_search_result: false, chapter: self.chapter() };
        serde_json::to_string(&view).unwrap_or_default()
    }

    /// Compact JSON of the tag list, e.g. `["basics","rust"]`.
    pub fn tags_json(&self) -> String {
        serde_json::to_string(&self.tags).unwrap_or_default()
    }

    pub fn categories_json(&self) -> String {
        serde_json::to_string(&self.categories).unwrap_or_default()
    }

    /// Chapter number embedded in the first two characters after the leading
    /// slash of `relpermalink` (`/01-intro/` is chapter 1).
    ///
    /// Parsing accepts leading whitespace, an optional sign and a run of
    /// decimal digits; anything else yields `None`.
    pub fn chapter(&self) -> Option<i64> {
        let window: String = self.relpermalink.chars().skip(1).take(2).collect();
        parse_int_prefix(&window)
    }
}

#[derive(Serialize)]
struct PassView<'a> {
    #[serde(flatten)]
    page: &'a PageRecord,
    score: i64,
    #[serde(rename = "toSearchResult")]
    to_search_result: bool,
    chapter: Option<i64>,
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// The rendered graphic's root element, as handed to a bind hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgElement {
    pub id: String,
    pub markup: String,
}

/// Post-render binding call returned by diagram libraries that attach
/// interactivity (click handlers, links) to the element they produced.
pub type BindHook = Box<dyn FnOnce(&mut SvgElement) + Send>;

/// Raw result of a diagram library call before normalization.
///
/// Libraries differ across versions: some return the markup directly, others
/// an object carrying `svg` and optionally `bind_functions`.
pub enum BackendResponse {
    Markup(String),
    Object {
        svg: Option<String>,
        bind_functions: Option<BindHook>,
    },
    /// Any other shape. The string describes what was returned.
    Unrecognized(String),
}

impl fmt::Debug for BackendResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(svg) => f.debug_tuple("Markup").field(svg).finish(),
            Self::Object { svg, bind_functions } => f
                .debug_struct("Object")
                .field("svg", svg)
                .field("bind_functions", &bind_functions.is_some())
                .finish(),
            Self::Unrecognized(shape) => f.debug_tuple("Unrecognized").field(shape).finish(),
        }
    }
}

/// Normalized render output: markup plus an optional bind hook.
pub struct RenderedDiagram {
    pub svg: String,
    pub bind: Option<BindHook>,
}

impl fmt::Debug for RenderedDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedDiagram")
            .field("svg", &self.svg)
            .field("bind", &self.bind.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_parses_two_leading_digits() {
        assert_eq!(PageRecord::new("Intro", "/01-intro/").chapter(), Some(1));
        assert_eq!(PageRecord::new("Deep", "/12-deep/").chapter(), Some(12));
        assert_eq!(PageRecord::new("One", "/7-one/").chapter(), Some(7));
        assert_eq!(PageRecord::new("About", "/about/").chapter(), None);
        assert_eq!(PageRecord::new("Root", "/").chapter(), None);
    }

    #[test]
    fn chapter_accepts_sign_like_parse_int() {
        assert_eq!(PageRecord::new("Neg", "/-3/").chapter(), Some(-3));
        assert_eq!(PageRecord::new("Dash", "/-x/").chapter(), None);
    }

    #[test]
    fn null_taxonomies_deserialize_as_empty() {
        let json = r#"{"title":"A","relpermalink":"/a/","tags":null,"categories":null,"content":"x","date":"2024-01-01"}"#;
        let page: PageRecord = serde_json::from_str(json).unwrap();
        assert!(page.tags.is_empty());
        assert!(page.categories.is_empty());
        assert_eq!(page.extra.get("date").and_then(Value::as_str), Some("2024-01-01"));
    }

    #[test]
    fn dump_includes_unknown_fields() {
        let mut page = PageRecord::new("A", "/a/");
        page.extra.insert("summary".into(), Value::String("hidden gem".into()));
        assert!(page.full_text_dump().contains("hidden gem"));
        assert!(page.full_text_dump().contains("\"relpermalink\":\"/a/\""));
    }

    #[test]
    fn dump_ends_with_pass_fields() {
        let intro = PageRecord::new("Intro", "/01-intro/");
        assert!(intro.full_text_dump().ends_with(",\"score\":0,\"toSearchResult\":false,\"chapter\":1}"));
        let about = PageRecord::new("About", "/about/");
        assert!(about.full_text_dump().ends_with("\"chapter\":null}"));
    }
}
