use crate::sitemap::error::SitemapError;
use crate::sitemap::parser::PairingMode;
use std::time::Duration;

/// Default configuration constants
pub mod defaults {
    /// Default maximum number of redirects followed per request
    pub const MAX_REDIRECTS: usize = 10;

    /// Whether every page URL gets a GET request by default
    pub const PROBE_PAGES: bool = true;

    /// Default user agent sent with every request
    pub const USER_AGENT: &str = concat!("sitemap-walker/", env!("CARGO_PKG_VERSION"));
}

/// Configuration for the walker
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Request timeout; `None` waits on the server indefinitely
    pub timeout: Option<Duration>,

    /// Issue a GET request against every page URL found
    pub probe_pages: bool,

    /// How `loc`/`lastmod` are paired with their entry element
    pub pairing: PairingMode,

    /// Maximum number of redirects followed per request
    pub max_redirects: usize,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        use defaults::*;

        Self {
            timeout: None,
            probe_pages: PROBE_PAGES,
            pairing: PairingMode::default(),
            max_redirects: MAX_REDIRECTS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl WalkerConfig {
    /// Create a builder for more granular configuration
    pub fn builder() -> WalkerConfigBuilder {
        WalkerConfigBuilder::default()
    }

    /// Check the configured values
    pub fn validate(&self) -> Result<(), SitemapError> {
        if self.timeout == Some(Duration::ZERO) {
            return Err(SitemapError::InvalidTimeout);
        }

        Ok(())
    }
}

/// Builder for WalkerConfig
#[derive(Default)]
pub struct WalkerConfigBuilder {
    config: WalkerConfig,
}

impl WalkerConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Enable or disable the per-page GET request
    pub fn probe_pages(mut self, probe: bool) -> Self {
        self.config.probe_pages = probe;
        self
    }

    /// Set the `loc`/`lastmod` pairing mode
    pub fn pairing(mut self, pairing: PairingMode) -> Self {
        self.config.pairing = pairing;
        self
    }

    /// Set the maximum number of redirects
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    /// Build the final WalkerConfig
    pub fn build(self) -> WalkerConfig {
        self.config
    }
}
