use crate::cert::config::{CertConfig, HexCase};
use crate::cert::error::CertError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;

static HEX_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xX]([0-9A-Fa-f]{2})$").expect("valid hex token regex"));

/// Rendered hex list plus the number of bytes it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexDump {
    /// The token list, possibly wrapped in a declaration
    pub body: String,

    /// Number of input bytes
    pub byte_count: usize,
}

impl fmt::Display for HexDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.body)?;
        write!(f, "Cert length = {}", self.byte_count)
    }
}

/// Render each byte as a `0xHH` token
pub fn hex_tokens(bytes: &[u8], case: HexCase) -> Vec<String> {
    bytes
        .iter()
        .map(|b| match case {
            HexCase::Lower => format!("0x{:02x}", b),
            HexCase::Upper => format!("0x{:02X}", b),
        })
        .collect()
}

/// Format `bytes` as a comma-separated token list according to `config`
pub fn format_hex(bytes: &[u8], config: &CertConfig) -> Result<HexDump, CertError> {
    config.validate()?;

    let tokens = hex_tokens(bytes, config.case);

    let lines: Vec<String> = match config.tokens_per_line {
        Some(n) => tokens.chunks(n).map(|chunk| chunk.join(", ")).collect(),
        None if tokens.is_empty() => Vec::new(),
        None => vec![tokens.join(", ")],
    };

    let body = match &config.array_name {
        Some(name) => {
            let mut decl = format!("const unsigned char {}[] = {{\n", name);
            if !lines.is_empty() {
                let indented: Vec<String> = lines.iter().map(|l| format!("    {}", l)).collect();
                decl.push_str(&indented.join(",\n"));
                decl.push('\n');
            }
            decl.push_str("};");
            decl
        }
        None => lines.join(",\n"),
    };

    Ok(HexDump {
        body,
        byte_count: bytes.len(),
    })
}

/// Decode a comma-separated `0xHH` list back into bytes.
///
/// Blank tokens are skipped, so a trailing comma or empty input is fine.
pub fn parse_hex_list(text: &str) -> Result<Vec<u8>, CertError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let digits = HEX_TOKEN
                .captures(token)
                .and_then(|caps| caps.get(1))
                .ok_or_else(|| CertError::InvalidToken(token.to_string()))?;
            u8::from_str_radix(digits.as_str(), 16)
                .map_err(|_| CertError::InvalidToken(token.to_string()))
        })
        .collect()
}

/// Read a whole file into memory
pub fn read_cert(path: &Path) -> Result<Vec<u8>, CertError> {
    let bytes = std::fs::read(path).map_err(|source| CertError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(bytes)
}

/// Read the configured file and format it
pub fn convert_file(config: &CertConfig) -> Result<HexDump, CertError> {
    config.validate()?;
    let bytes = read_cert(&config.path)?;
    format_hex(&bytes, config)
}
