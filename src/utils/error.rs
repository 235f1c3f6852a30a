use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirehoseError {
    #[error("URL has no path component: '{url}'")]
    MissingPath { url: String },

    #[error("repeated query argument '{key}', bailing")]
    InvalidQuery { key: String },

    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON array of rows, got {got}")]
    UnexpectedBody { got: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Source error: {message}")]
    Source { message: String },

    #[error("Invalid source: {name}")]
    UnknownSource { name: String },
}

pub type Result<T> = std::result::Result<T, FirehoseError>;
