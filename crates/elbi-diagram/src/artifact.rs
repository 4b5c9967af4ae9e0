use std::path::{Path, PathBuf};

use elbi_core::error::Result;

pub const SVG_MIME: &str = "image/svg+xml;charset=utf-8";

/// Downloadable copy of a rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub block_id: String,
    /// On-disk name, `{block_id}.svg`.
    pub file_name: String,
    /// Value of the control's `download` attribute.
    pub download_name: String,
    pub mime: &'static str,
    /// Link the export control points at.
    pub href: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn svg(block_id: &str, export_base: &str, markup: &str) -> Self {
        let file_name = format!("{block_id}.svg");
        let href = if export_base.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{file_name}", export_base.trim_end_matches('/'))
        };
        Self {
            block_id: block_id.to_string(),
            download_name: block_id.to_string(),
            file_name,
            mime: SVG_MIME,
            href,
            bytes: markup.as_bytes().to_vec(),
        }
    }

    /// Writes the artifact into `dir`, creating it if needed.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}
