use thiserror::Error;

/// Sitemap walker errors
#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP status error: {0}")]
    HttpStatus(String),

    #[error("Not an XML document: {0}")]
    NotXml(String),

    #[error("<{parent}> element without <{tag}> in {url}")]
    MissingTag {
        tag: &'static str,
        parent: &'static str,
        url: String,
    },

    #[error("<{parent}> element with an empty <loc> in {url}")]
    EmptyLocation { parent: &'static str, url: String },
}
