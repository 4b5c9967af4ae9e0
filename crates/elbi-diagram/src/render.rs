use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use elbi_core::config::DiagramSettings;
use elbi_core::error::{Error, Result};
use elbi_core::traits::DiagramBackend;
use elbi_core::types::SvgElement;

use crate::adapter::normalize;
use crate::artifact::ExportArtifact;
use crate::locate::{locate_blocks, splice_blocks, DiagramBlock};
use crate::markup::{contains_element, error_panel, export_control, toggle_classes, wrapper, MODAL_CLASS, SVG_CLASS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererOptions {
    pub marker_classes: Vec<String>,
    pub id_prefix: String,
    /// Tooltip of the export control.
    pub download_label: String,
    /// Prefix of export links; artifacts are expected to live there.
    pub export_base: String,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self::from(&DiagramSettings::default())
    }
}

impl From<&DiagramSettings> for RendererOptions {
    fn from(settings: &DiagramSettings) -> Self {
        Self {
            marker_classes: settings.marker_classes.clone(),
            id_prefix: settings.id_prefix.clone(),
            download_label: settings.download_label.clone(),
            export_base: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Rendered { id: String },
    Failed { id: String, message: String },
}

impl BlockOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    /// One entry per block, in page order.
    pub outcomes: Vec<BlockOutcome>,
    pub artifacts: Vec<ExportArtifact>,
}

impl RenderedPage {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_rendered()).count()
    }
}

struct BlockRender {
    markup: String,
    outcome: BlockOutcome,
    artifact: Option<ExportArtifact>,
}

/// Renders every diagram block of `html` concurrently and splices the results in.
///
/// Pages with blocks are re-serialized; pages without any are returned as-is.
///
/// Blocks are independent: a failing block gets an inline error panel and a
/// hidden export control, and never affects its siblings.
pub async fn render_page(html: &str, backend: &dyn DiagramBackend, options: &RendererOptions) -> RenderedPage {
    let blocks = locate_blocks(html, &options.marker_classes, &options.id_prefix);
    debug!(blocks = blocks.len(), "diagram blocks located");
    if blocks.is_empty() {
        return RenderedPage { html: html.to_string(), outcomes: Vec::new(), artifacts: Vec::new() };
    }

    let mut renders: Vec<Option<BlockRender>> = (0..blocks.len()).map(|_| None).collect();
    let mut pending: FuturesUnordered<_> = blocks
        .iter()
        .map(|block| async move { (block.index, render_block(block, backend, options).await) })
        .collect();
    while let Some((index, render)) = pending.next().await {
        renders[index] = Some(render);
    }

    let mut page = RenderedPage { html: String::new(), outcomes: Vec::new(), artifacts: Vec::new() };
    let mut markups = Vec::with_capacity(blocks.len());
    for render in renders.into_iter().flatten() {
        markups.push(render.markup);
        page.outcomes.push(render.outcome);
        page.artifacts.extend(render.artifact);
    }
    page.html = splice_blocks(html, &options.marker_classes, &markups);
    page
}

async fn render_block(block: &DiagramBlock, backend: &dyn DiagramBackend, options: &RendererOptions) -> BlockRender {
    match try_render(block, backend, options).await {
        Ok((svg, artifact)) => {
            debug!(block = %block.id, "diagram rendered");
            let control = export_control(&block.id, &options.download_label, Some(&artifact.href));
            BlockRender {
                markup: wrapper(&block.id, &format!("{svg}{control}")),
                outcome: BlockOutcome::Rendered { id: block.id.clone() },
                artifact: Some(artifact),
            }
        }
        Err(e) => {
            let message = e.to_string();
            warn!(block = %block.id, error = %message, "diagram render failed");
            let panel = error_panel(&block.id, &message);
            let control = export_control(&block.id, &options.download_label, None);
            BlockRender {
                markup: wrapper(&block.id, &format!("{panel}{control}")),
                outcome: BlockOutcome::Failed { id: block.id.clone(), message },
                artifact: None,
            }
        }
    }
}

async fn try_render(
    block: &DiagramBlock,
    backend: &dyn DiagramBackend,
    options: &RendererOptions,
) -> Result<(String, ExportArtifact)> {
    let svg_id = block.svg_id();
    let rendered = normalize(backend.render(&svg_id, &block.source).await?)?;
    if !contains_element(&rendered.svg, &svg_id) {
        return Err(Error::Render("Rendered SVG was not found".to_string()));
    }

    let mut element = SvgElement { id: svg_id, markup: rendered.svg };
    if let Some(bind) = rendered.bind {
        bind(&mut element);
    }
    // The export is taken before display classes are applied.
    let artifact = ExportArtifact::svg(&block.id, &options.export_base, &element.markup);
    let svg = toggle_classes(&element.markup, &element.id, SVG_CLASS, MODAL_CLASS);
    Ok((svg, artifact))
}
