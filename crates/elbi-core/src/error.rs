use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to fetch page index from {origin}: {message}")]
    IndexFetch { origin: String, message: String },

    #[error("Malformed page index: {0}")]
    IndexParse(#[from] serde_json::Error),

    /// Carries the diagram library's message verbatim; it is shown to readers.
    #[error("{0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
