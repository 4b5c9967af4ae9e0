use std::fs;
use std::path::Path;
use tempfile::TempDir;

use elbi_core::config::{resolve_with_base, Config, TieBreak};
use elbi_core::error::Error;
use elbi_core::types::PageRecord;

#[test]
fn defaults_apply_without_config_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_for_env(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");

    assert_eq!(settings.search.debounce_ms, 1000);
    assert_eq!(settings.search.snippet_length, 200);
    assert!(settings.search.display_counter);
    assert!(!settings.search.display_score);
    assert_eq!(settings.search.tie_break, TieBreak::Collection);
    assert_eq!(settings.diagram.marker_classes, vec!["language-mermaid".to_string()]);
    assert_eq!(settings.diagram.id_prefix, "scMermaid");
}

#[test]
fn env_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("elbi.toml"),
        "[search]\ndebounce_ms = 250\nsnippet_length = 80\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("elbi.test.toml"),
        "[search]\ndebounce_ms = 10\ntie_break = \"title\"\n",
    )
    .unwrap();

    let config = Config::load_for_env(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.search.debounce_ms, 10, "env file wins");
    assert_eq!(settings.search.snippet_length, 80, "base file still applies");
    assert_eq!(settings.search.tie_break, TieBreak::Title);

    let theme: String = config.get("diagram.theme").expect("theme");
    assert_eq!(theme, "default");
}

#[test]
fn invalid_settings_are_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("elbi.toml"), "[diagram]\nmarker_classes = []\n").unwrap();

    let err = Config::load_for_env(tmp.path(), "test").err().expect("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err}");
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = Path::new("/srv/site");
    assert_eq!(resolve_with_base(base, "public/index.json"), base.join("public/index.json"));
    assert_eq!(resolve_with_base(base, "/tmp/index.json"), Path::new("/tmp/index.json"));
}

#[test]
fn page_index_parses_generator_output() {
    let json = r#"[
        {"title":"Intro","relpermalink":"/01-intro/","tags":["basics"],"categories":[],"content":"hello world"},
        {"title":"About","relpermalink":"/about/","content":"who we are"}
    ]"#;
    let pages: Vec<PageRecord> = serde_json::from_str(json).expect("parse");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].tags, vec!["basics".to_string()]);
    assert!(pages[1].tags.is_empty());
    assert_eq!(pages[0].chapter(), Some(1));
    assert_eq!(pages[1].chapter(), None);
}
