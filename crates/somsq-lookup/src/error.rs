use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("column '{column}' not found in csv input (headers: {headers})")]
    MissingColumn { column: String, headers: String },
}

pub type Result<T> = std::result::Result<T, LookupError>;
