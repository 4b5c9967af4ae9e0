//! Helpers behind the `elbi` binary: choosing the index source and mapping
//! HTML pages to their rewritten output and export artifacts.

pub mod pages;
pub mod sources;
