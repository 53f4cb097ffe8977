use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("No results found for \"{0}\"")]
    NoResults(String),

    #[error("Search superseded by a newer one")]
    Superseded,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
