use elbi_core::config::SearchSettings;

use crate::highlight::Highlights;
use crate::scoring::ScoredPage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Characters of context either side of an excerpt match.
    pub snippet_length: usize,
    /// Emit the total-count line and a rank line before each entry.
    pub display_counter: bool,
    /// Emit the raw score after each entry.
    pub display_score: bool,
    /// Counter line text; `{count}` is replaced by the number of results.
    pub total_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&SearchSettings::default())
    }
}

impl From<&SearchSettings> for RenderOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            snippet_length: settings.snippet_length,
            display_counter: settings.display_counter,
            display_score: settings.display_score,
            total_label: settings.total_label.clone(),
        }
    }
}

/// Renders the results container's contents for one search pass.
pub fn render_results(hits: &[ScoredPage<'_>], terms: &[String], options: &RenderOptions) -> String {
    let mut html = String::new();

    if options.display_counter {
        let label = options.total_label.replace("{count}", &hits.len().to_string());
        html.push_str(&format!("<p>{label}</p>"));
    }

    for (rank, hit) in hits.iter().enumerate() {
        let marked = Highlights::compute(hit.page, terms, options.snippet_length);

        if options.display_counter {
            html.push_str(&format!("<p>№ {}</p>", rank + 1));
        }
        html.push_str(&render_entry(&hit.page.relpermalink, &marked));
        if options.display_score {
            html.push_str(&format!("<p>Result score: {}</p>", hit.score));
        }
    }
    html
}

fn render_entry(link: &str, marked: &Highlights) -> String {
    format!(
        "<li class='elbi-results-item'><h2 style='font-size: 1.5rem;'><a href='{link}'>{}</a></h2>\
         <p>{}</p><p style='margin-top: 5px'>Tagged: <strong>{}</strong></p></li>",
        marked.title, marked.excerpts, marked.tags
    )
}
