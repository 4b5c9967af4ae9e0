use std::path::Path;

use elbi_core::config::{resolve_with_base, SearchSettings};
use elbi_core::traits::IndexSource;
use elbi_search::{FileIndexSource, HttpIndexSource};

/// Picks the index source: `--url`, then `--index`, then the configured
/// `index_url`, then the configured `index_path` resolved against `base`.
pub fn index_source(
    settings: &SearchSettings,
    base: &Path,
    index: Option<&str>,
    url: Option<&str>,
) -> Box<dyn IndexSource> {
    if let Some(url) = url {
        return Box::new(http_source(url));
    }
    if let Some(index) = index {
        return Box::new(FileIndexSource::new(resolve_with_base(base, index)));
    }
    match &settings.index_url {
        Some(url) => Box::new(http_source(url)),
        None => Box::new(FileIndexSource::new(resolve_with_base(base, &settings.index_path))),
    }
}

/// A URL naming a `.json` file is used as-is; anything else is a site root.
fn http_source(url: &str) -> HttpIndexSource {
    if url.ends_with(".json") {
        HttpIndexSource::new(url)
    } else {
        HttpIndexSource::for_site(url)
    }
}
