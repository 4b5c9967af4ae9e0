//! elbi-search
//!
//! Client-side style full-text filter over a pre-built page index: query
//! tokenizing, filtering, weighted scoring, highlighting and rendering of the
//! results fragment, plus a debounced session that drives it from input events.

pub mod debounce;
pub mod highlight;
pub mod index;
pub mod query;
pub mod render;
pub mod scoring;
pub mod session;
pub mod text;

pub use index::{load_index, FileIndexSource, HttpIndexSource};
pub use query::parse_terms;
pub use render::{render_results, RenderOptions};
pub use scoring::{rank, ScoredPage};
pub use session::{SearchOutcome, SearchSession};
