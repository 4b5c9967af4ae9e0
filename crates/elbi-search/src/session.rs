use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use elbi_core::config::{SearchSettings, TieBreak};
use elbi_core::types::PageRecord;

use crate::debounce::Debounce;
use crate::query::parse_terms;
use crate::render::{render_results, RenderOptions};
use crate::scoring::{rank, ScoredPage};

/// Projection produced by one search pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'a> {
    pub terms: Vec<String>,
    pub hits: Vec<ScoredPage<'a>>,
}

impl SearchOutcome<'_> {
    pub fn render(&self, options: &RenderOptions) -> String {
        render_results(&self.hits, &self.terms, options)
    }
}

/// The search widget: an immutable page collection plus the current
/// contents of the results container.
pub struct SearchSession {
    pages: Vec<PageRecord>,
    options: RenderOptions,
    tie_break: TieBreak,
    results: String,
    passes: usize,
}

impl SearchSession {
    pub fn new(pages: Vec<PageRecord>, options: RenderOptions, tie_break: TieBreak) -> Self {
        Self { pages, options, tie_break, results: String::new(), passes: 0 }
    }

    pub fn from_settings(pages: Vec<PageRecord>, settings: &SearchSettings) -> Self {
        Self::new(pages, RenderOptions::from(settings), settings.tie_break)
    }

    /// Current contents of the results container.
    pub fn results_html(&self) -> &str {
        &self.results
    }

    /// Number of search passes that re-rendered the results.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Runs a pass for `query` without touching the session state.
    ///
    /// Returns `None` when the query is empty or yields no terms.
    pub fn search(&self, query: &str) -> Option<SearchOutcome<'_>> {
        if query.is_empty() {
            return None;
        }
        let terms = parse_terms(query);
        if terms.is_empty() {
            return None;
        }
        let hits = rank(&self.pages, &terms, self.tie_break);
        debug!(?terms, hits = hits.len(), "search pass");
        Some(SearchOutcome { terms, hits })
    }

    /// Handles one evaluated input value. Returns whether results re-rendered.
    pub fn on_input(&mut self, query: &str) -> bool {
        let Some(html) = self.search(query).map(|outcome| outcome.render(&self.options)) else {
            return false;
        };
        self.results = html;
        self.passes += 1;
        true
    }

    /// Feeds input values through a debounce of `delay` and calls `on_render`
    /// with the results after every re-render. Returns when `inputs` closes.
    pub async fn drive<F>(&mut self, inputs: mpsc::Receiver<String>, delay: Duration, mut on_render: F)
    where
        F: FnMut(&str),
    {
        let mut debounce = Debounce::new(inputs, delay);
        while let Some(value) = debounce.next().await {
            if self.on_input(&value) {
                on_render(&self.results);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SearchSession {
        let pages = vec![
            PageRecord::new("Intro", "/01-intro/").with_tags(["basics"]).with_content("hello world"),
            PageRecord::new("Setup", "/02-setup/").with_content("install the intro kit"),
        ];
        SearchSession::new(pages, RenderOptions::default(), TieBreak::Collection)
    }

    #[test]
    fn empty_input_leaves_results_untouched() {
        let mut s = session();
        assert!(s.on_input("intro"));
        let before = s.results_html().to_string();

        assert!(!s.on_input(""));
        assert!(!s.on_input("   "));
        assert_eq!(s.results_html(), before);
        assert_eq!(s.passes(), 1);
    }

    #[test]
    fn passes_do_not_leak_scores() {
        let s = session();
        let first = s.search("intro").unwrap();
        let second = s.search("intro").unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn drive_renders_once_per_idle_period() {
        let mut s = session();
        let (tx, rx) = mpsc::channel(8);
        for value in ["i", "in", "intro"] {
            tx.send(value.to_string()).await.unwrap();
        }
        drop(tx);

        let mut renders = Vec::new();
        s.drive(rx, Duration::from_millis(1000), |html| renders.push(html.to_string())).await;

        assert_eq!(renders.len(), 1);
        assert!(renders[0].contains("<mark>Intro</mark>"));
    }
}
