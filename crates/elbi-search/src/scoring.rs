//! Filter, weighted scoring and ordering of pages for a term set.

use std::cmp::Reverse;

use elbi_core::config::TieBreak;
use elbi_core::types::PageRecord;

use crate::text::fold;

pub const TITLE_POINTS: i64 = 3;
pub const TAG_POINTS: i64 = 2;
pub const CONTENT_POINTS: i64 = 1;
pub const CATEGORY_POINTS: i64 = 1;

/// A page that survived filtering and scoring for one search pass.
///
/// Built fresh per pass; the page collection itself is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPage<'a> {
    pub page: &'a PageRecord,
    /// Position of the page in the index.
    pub position: usize,
    pub score: i64,
    /// Chapter weight after the last term; `None` for pages without a chapter.
    pub chapter_weight: Option<i64>,
}

/// Filters, scores and orders `pages` for `terms`.
///
/// Terms are compared folded. A page survives the filter only if every term
/// occurs in its full-text dump, and is kept only if some term matched one of
/// its weighted fields.
pub fn rank<'a>(pages: &'a [PageRecord], terms: &[String], tie_break: TieBreak) -> Vec<ScoredPage<'a>> {
    let folded: Vec<String> = terms.iter().map(|t| fold(t)).filter(|t| !t.is_empty()).collect();
    if folded.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<ScoredPage<'a>> = pages
        .iter()
        .enumerate()
        .filter(|(_, page)| passes_filter(page, &folded))
        .filter_map(|(position, page)| score_page(page, position, &folded))
        .collect();

    sort_hits(&mut hits, tie_break);
    hits
}

fn passes_filter(page: &PageRecord, terms: &[String]) -> bool {
    let dump = fold(&page.full_text_dump());
    terms.iter().all(|term| dump.contains(term.as_str()))
}

fn score_page<'a>(page: &'a PageRecord, position: usize, terms: &[String]) -> Option<ScoredPage<'a>> {
    let title = fold(&page.title);
    let tags = fold(&page.tags_json());
    let content = fold(&page.content);
    let categories = fold(&page.categories_json());

    let mut chapter_weight = page.chapter();
    let mut score = 0;
    let mut matched = false;

    for term in terms {
        let term = term.as_str();
        let fields = [
            (title.contains(term), TITLE_POINTS),
            (tags.contains(term), TAG_POINTS),
            (content.contains(term), CONTENT_POINTS),
            (categories.contains(term), CATEGORY_POINTS),
        ];
        for (hit, points) in fields {
            if hit {
                score += points;
                matched = true;
            }
        }
        // The weight flips sign on every term before it is added.
        if let Some(weight) = chapter_weight.as_mut() {
            *weight = -*weight;
            score += *weight;
        }
    }

    matched.then_some(ScoredPage { page, position, score, chapter_weight })
}

fn sort_hits(hits: &mut [ScoredPage<'_>], tie_break: TieBreak) {
    match tie_break {
        TieBreak::Collection => hits.sort_by_key(|hit| (Reverse(hit.score), hit.position)),
        TieBreak::Title => {
            hits.sort_by_cached_key(|hit| hit.page.title.to_lowercase());
            hits.sort_by_key(|hit| Reverse(hit.score));
        }
    }
}
