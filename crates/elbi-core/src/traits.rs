use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BackendResponse, PageRecord};

/// Where the pre-built page index comes from.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Human-readable origin used in logs and errors.
    fn origin(&self) -> String;
    async fn load(&self) -> Result<Vec<PageRecord>>;
}

/// An external diagram library.
///
/// `svg_id` is the identifier the produced root element must carry.
#[async_trait]
pub trait DiagramBackend: Send + Sync {
    async fn render(&self, svg_id: &str, source: &str) -> Result<BackendResponse>;
}
