use crate::sitemap::config::WalkerConfig;
use crate::sitemap::error::SitemapError;
use crate::sitemap::utils::looks_like_markup;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use url::Url;

/// Handles HTTP client creation and the plain GET requests the walker issues
pub struct NetworkClient {
    /// The HTTP client
    client: Client,
}

impl NetworkClient {
    /// Create a new network client with the given configuration
    pub fn new(config: &WalkerConfig) -> Result<Self, SitemapError> {
        // Plain client: redirect limit and user agent only
        let mut builder = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str());

        // No timeout unless one was asked for
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| SitemapError::HttpClient(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Send a GET request, failing only on transport errors
    async fn get(&self, url: &str) -> Result<Response, SitemapError> {
        let parsed_url = Url::parse(url)?;

        debug!("GET {}", parsed_url);

        self.client
            .get(parsed_url)
            .send()
            .await
            .map_err(|e| SitemapError::NetworkError(format!("Failed to fetch {}: {}", url, e)))
    }

    /// Fetch a URL, requiring a success status
    pub async fn fetch(&self, url: &str) -> Result<Response, SitemapError> {
        let response = self.get(url).await?;

        // Check response status
        if !response.status().is_success() {
            return Err(SitemapError::HttpStatus(format!(
                "HTTP error status: {} for {}",
                response.status(),
                url
            )));
        }

        Ok(response)
    }

    /// Fetch a sitemap document and return its body
    pub async fn fetch_markup(&self, url: &str) -> Result<String, SitemapError> {
        let response = self.fetch(url).await?;
        let body = response.text().await?;

        debug!("Fetched {} ({} bytes)", url, body.len());

        // Anything that does not open with a tag is not a sitemap
        if !looks_like_markup(&body) {
            return Err(SitemapError::NotXml(url.to_string()));
        }

        Ok(body)
    }

    /// Issue a GET against a page and discard the body
    pub async fn probe(&self, url: &str) -> Result<StatusCode, SitemapError> {
        let response = self.get(url).await?;
        let status = response.status();
        debug!("Probed {}: {}", url, status);
        Ok(status)
    }
}
