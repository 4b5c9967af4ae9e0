use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use elbi_core::traits::DiagramBackend;
use elbi_diagram::{render_page, RenderedPage, RendererOptions};

/// One HTML page to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Directory the page's export artifacts are written to.
    pub artifact_dir: PathBuf,
    /// Link prefix of the export controls, relative to the page.
    pub export_base: String,
}

impl PageJob {
    fn new(input: PathBuf, output: PathBuf) -> Self {
        let stem = output
            .file_stem()
            .map_or_else(|| "page".to_string(), |s| s.to_string_lossy().to_string());
        let export_base = format!("{stem}-diagrams");
        let artifact_dir = output
            .parent()
            .map_or_else(|| PathBuf::from(&export_base), |dir| dir.join(&export_base));
        Self { input, output, artifact_dir, export_base }
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Expands files and directories into page jobs.
///
/// Without `out_dir` pages are rewritten in place; with it, directory inputs
/// keep their relative layout and file inputs land at the top level.
pub fn collect_jobs(paths: &[PathBuf], out_dir: Option<&Path>) -> Result<Vec<PageJob>> {
    let mut jobs = Vec::new();
    for root in paths {
        if root.is_dir() {
            let mut files: Vec<PathBuf> = WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_html(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect();
            files.sort();
            for file in files {
                let output = match out_dir {
                    Some(out) => out.join(file.strip_prefix(root).unwrap_or(&file)),
                    None => file.clone(),
                };
                jobs.push(PageJob::new(file, output));
            }
        } else if root.is_file() {
            let output = match (out_dir, root.file_name()) {
                (Some(out), Some(name)) => out.join(name),
                _ => root.clone(),
            };
            jobs.push(PageJob::new(root.clone(), output));
        } else {
            anyhow::bail!("No such file or directory: {}", root.display());
        }
    }
    Ok(jobs)
}

/// Renders one page, writing its artifacts and the rewritten HTML.
///
/// Pages without diagram blocks are left untouched in place, and copied
/// unchanged when the output lives elsewhere.
pub async fn process_job(
    job: &PageJob,
    backend: &dyn DiagramBackend,
    options: &RendererOptions,
) -> Result<RenderedPage> {
    let html = tokio::fs::read_to_string(&job.input)
        .await
        .with_context(|| format!("reading {}", job.input.display()))?;
    let options = RendererOptions { export_base: job.export_base.clone(), ..options.clone() };
    let rendered = render_page(&html, backend, &options).await;

    if rendered.outcomes.is_empty() {
        debug!(page = %job.input.display(), "no diagram blocks");
        if job.output != job.input {
            write_page(&job.output, &html).await?;
        }
        return Ok(rendered);
    }

    for artifact in &rendered.artifacts {
        artifact
            .write_to(&job.artifact_dir)
            .await
            .with_context(|| format!("writing {} artifact", artifact.block_id))?;
    }
    write_page(&job.output, &rendered.html).await?;

    info!(
        page = %job.output.display(),
        blocks = rendered.outcomes.len(),
        failed = rendered.failures(),
        "page rewritten"
    );
    Ok(rendered)
}

async fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("writing {}", path.display()))
}
