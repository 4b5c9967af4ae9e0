//! elbi-diagram
//!
//! Turns diagram source blocks of generated HTML pages into inline vector
//! graphics with an export-to-file control. Rendering is delegated to an
//! external library behind [`elbi_core::traits::DiagramBackend`]; see
//! `adapter` for how its return shapes are normalized.

pub mod adapter;
pub mod artifact;
pub mod command;
pub mod locate;
pub mod markup;
pub mod render;

pub use artifact::ExportArtifact;
pub use command::CommandBackend;
pub use locate::{locate_blocks, splice_blocks, DiagramBlock};
pub use render::{render_page, BlockOutcome, RenderedPage, RendererOptions};
