pub mod config;
pub mod error;
pub mod formatter;

pub use config::{CertConfig, HexCase};
pub use error::CertError;
pub use formatter::{convert_file, format_hex, parse_hex_list, HexDump};
