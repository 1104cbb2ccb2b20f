pub mod config;
pub mod error;
pub mod network;
pub mod parser;
pub mod utils;
pub mod walker;

pub use config::WalkerConfig;
pub use error::SitemapError;
pub use parser::{EntryKind, PairingMode, ParsedSitemap, SitemapEntry};
pub use walker::{ChildReport, WalkReport, Walker};
