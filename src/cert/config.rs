use crate::cert::error::CertError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static C_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Letter case of the hex digits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HexCase {
    #[default]
    Lower,
    Upper,
}

/// Configuration for one file conversion
#[derive(Debug, Clone)]
pub struct CertConfig {
    /// File to read
    pub path: PathBuf,

    /// Letter case of the hex digits
    pub case: HexCase,

    /// Wrap the list in a `const unsigned char NAME[]` declaration
    pub array_name: Option<String>,

    /// Maximum number of tokens per output line; `None` keeps one line
    pub tokens_per_line: Option<usize>,
}

impl CertConfig {
    /// Create a config for `path` with default formatting
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            case: HexCase::default(),
            array_name: None,
            tokens_per_line: None,
        }
    }

    /// Create a builder for more granular configuration
    pub fn builder(path: impl AsRef<Path>) -> CertConfigBuilder {
        CertConfigBuilder {
            config: Self::new(path),
        }
    }

    /// Check the formatting options
    pub fn validate(&self) -> Result<(), CertError> {
        if let Some(name) = &self.array_name {
            if !C_IDENTIFIER.is_match(name) {
                return Err(CertError::InvalidIdentifier(name.clone()));
            }
        }

        if self.tokens_per_line == Some(0) {
            return Err(CertError::InvalidWrap);
        }

        Ok(())
    }
}

/// Builder for CertConfig
pub struct CertConfigBuilder {
    config: CertConfig,
}

impl CertConfigBuilder {
    /// Set the hex digit case
    pub fn case(mut self, case: HexCase) -> Self {
        self.config.case = case;
        self
    }

    /// Wrap the output in a C array declaration named `name`
    pub fn array_name(mut self, name: &str) -> Self {
        self.config.array_name = Some(name.to_string());
        self
    }

    /// Put at most `n` tokens on each line
    pub fn tokens_per_line(mut self, n: usize) -> Self {
        self.config.tokens_per_line = Some(n);
        self
    }

    /// Build the final CertConfig
    pub fn build(self) -> CertConfig {
        self.config
    }
}
