use async_trait::async_trait;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use elbi_cli::pages::{collect_jobs, process_job};
use elbi_cli::sources::index_source;
use elbi_core::config::SearchSettings;
use elbi_core::error::Result;
use elbi_core::traits::DiagramBackend;
use elbi_core::types::BackendResponse;
use elbi_diagram::RendererOptions;

struct EchoMermaid;

#[async_trait]
impl DiagramBackend for EchoMermaid {
    async fn render(&self, svg_id: &str, _source: &str) -> Result<BackendResponse> {
        Ok(BackendResponse::Markup(format!("<svg id=\"{svg_id}\"></svg>")))
    }
}

const PAGE: &str = "<main><pre><code class=\"language-mermaid\">graph TD; A</code></pre></main>";

#[test]
fn directory_inputs_keep_layout_under_out_dir() {
    let site = TempDir::new().unwrap();
    fs::create_dir_all(site.path().join("guide")).unwrap();
    fs::write(site.path().join("index.html"), "<p/>").unwrap();
    fs::write(site.path().join("guide/index.html"), PAGE).unwrap();
    fs::write(site.path().join("guide/notes.txt"), "skip").unwrap();
    let out = TempDir::new().unwrap();

    let jobs = collect_jobs(&[site.path().to_path_buf()], Some(out.path())).expect("collect");
    assert_eq!(jobs.len(), 2);
    let guide = jobs.iter().find(|j| j.input.ends_with("guide/index.html")).unwrap();
    assert_eq!(guide.output, out.path().join("guide/index.html"));
    assert_eq!(guide.artifact_dir, out.path().join("guide/index-diagrams"));
    assert_eq!(guide.export_base, "index-diagrams");
}

#[test]
fn missing_input_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(collect_jobs(&[tmp.path().join("nope.html")], None).is_err());
}

#[tokio::test]
async fn process_job_writes_page_and_artifacts_in_place() {
    let site = TempDir::new().unwrap();
    let page = site.path().join("post.html");
    fs::write(&page, PAGE).unwrap();

    let jobs = collect_jobs(&[page.clone()], None).unwrap();
    let rendered = process_job(&jobs[0], &EchoMermaid, &RendererOptions::default()).await.expect("process");

    assert_eq!(rendered.outcomes.len(), 1);
    let html = fs::read_to_string(&page).unwrap();
    assert!(html.contains("href=\"post-diagrams/scMermaid0.svg\""));
    let svg = fs::read_to_string(site.path().join("post-diagrams/scMermaid0.svg")).unwrap();
    assert_eq!(svg, "<svg id=\"scMermaid0-svg\"></svg>");
}

#[tokio::test]
async fn pages_without_diagrams_are_copied_to_out_dir() {
    let site = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::create_dir_all(site.path().join("notes")).unwrap();
    fs::write(site.path().join("notes/plain.html"), "<p>text &amp; more</p>").unwrap();

    let jobs = collect_jobs(&[site.path().to_path_buf()], Some(out.path())).unwrap();
    let rendered = process_job(&jobs[0], &EchoMermaid, &RendererOptions::default()).await.unwrap();

    assert!(rendered.outcomes.is_empty());
    let copied = fs::read_to_string(out.path().join("notes/plain.html")).unwrap();
    assert_eq!(copied, "<p>text &amp; more</p>");
    assert!(!out.path().join("notes/plain-diagrams").exists());
}

#[tokio::test]
async fn pages_without_diagrams_are_untouched_in_place() {
    let site = TempDir::new().unwrap();
    let page = site.path().join("plain.html");
    fs::write(&page, "<p>text</p>").unwrap();

    let jobs = collect_jobs(&[page.clone()], None).unwrap();
    process_job(&jobs[0], &EchoMermaid, &RendererOptions::default()).await.unwrap();
    assert_eq!(fs::read_to_string(&page).unwrap(), "<p>text</p>");
    assert!(!site.path().join("plain-diagrams").exists());
}

#[test]
fn index_source_precedence() {
    let base = Path::new("/srv/site");
    let mut settings = SearchSettings::default();

    assert_eq!(index_source(&settings, base, None, None).origin(), "/srv/site/public/index.json");
    assert_eq!(index_source(&settings, base, Some("idx.json"), None).origin(), "/srv/site/idx.json");
    assert_eq!(
        index_source(&settings, base, Some("idx.json"), Some("https://example.org")).origin(),
        "https://example.org/index.json"
    );

    settings.index_url = Some("https://docs.example.org/search.json".into());
    assert_eq!(index_source(&settings, base, None, None).origin(), "https://docs.example.org/search.json");
}
