//! Request configuration assembled from flags and descriptor directives.
//!
//! # Design
//! `RequestConfig` is a plain record. The host fills it from command-line
//! flags, the descriptor parser overrides fields from the input's leading
//! directives, and the result is moved into `Pipeline`, after which it is no
//! longer mutated. Algorithm names stay strings here; they are resolved
//! against the cipher and codec registries when the pipeline is built.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// What the pipeline does with the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Transform the body, send it, reverse-transform the response.
    #[default]
    Send,
    /// Transform the body and emit it. No network.
    Encode,
    /// Treat the body as a response and reverse-transform it. No network.
    Decode,
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send" => Ok(ExecutionMode::Send),
            "encode" => Ok(ExecutionMode::Encode),
            "decode" => Ok(ExecutionMode::Decode),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecutionMode::Send => "send",
            ExecutionMode::Encode => "encode",
            ExecutionMode::Decode => "decode",
        })
    }
}

/// Cipher algorithm, chaining mode and padding scheme, e.g. `AES/ECB/PKCS5PADDING`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CipherSpec {
    pub algorithm: String,
    pub mode: String,
    pub padding: String,
}

impl CipherSpec {
    /// Split a slash-delimited cipher string. Returns `None` for an empty string.
    ///
    /// A trailing `PADDING` on the third segment is dropped, so
    /// `PKCS5PADDING` becomes `PKCS5`. Names are not validated here.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        let mut parts = s.split('/');
        let algorithm = parts.next().unwrap_or_default().to_string();
        let mode = parts.next().unwrap_or_default().to_string();
        let padding = parts.next().unwrap_or_default();
        let padding = match padding.strip_suffix("PADDING") {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => padding,
        };
        Some(CipherSpec {
            algorithm,
            mode,
            padding: padding.to_string(),
        })
    }
}

impl fmt::Display for CipherSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.algorithm, self.mode, self.padding)
    }
}

/// Everything needed to build, send and post-process one request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestConfig {
    /// Target URL; empty means unset.
    pub url: String,
    pub method: String,
    /// Header pairs in insertion order. Duplicate names are allowed.
    pub headers: Vec<(String, String)>,
    pub mode: ExecutionMode,
    /// Report the HTTP status through the process exit code instead of a
    /// status line in front of the output.
    pub exit_as_return_code: bool,
    pub verbose: bool,
    #[serde(skip)]
    pub cipher_key: Vec<u8>,
    pub encryption: Option<CipherSpec>,
    /// Output encodings, applied in order after encryption.
    pub encode: Vec<String>,
    /// Single input decoding, applied before decryption.
    pub decode: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "POST".to_string(),
            headers: Vec::new(),
            mode: ExecutionMode::Send,
            exit_as_return_code: false,
            verbose: false,
            cipher_key: Vec::new(),
            encryption: None,
            encode: Vec::new(),
            decode: None,
        }
    }
}

impl RequestConfig {
    /// Append headers from a comma-separated `name:value` list.
    ///
    /// Each entry is split at its first `:`, so values may contain colons.
    /// Empty entries are skipped.
    pub fn add_headers(&mut self, list: &str) -> Result<(), ConfigError> {
        for entry in list.split(',').filter(|e| !e.is_empty()) {
            let (name, value) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidHeader(entry.to_string()))?;
            self.headers.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }

    /// Replace the encode list from a comma-separated string.
    pub fn set_encode(&mut self, list: &str) {
        self.encode = list
            .split(',')
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Set the decode name; the empty string clears it.
    pub fn set_decode(&mut self, name: &str) {
        self.decode = (!name.is_empty()).then(|| name.to_string());
    }

    /// Whether any outbound or inbound transform is configured.
    pub fn has_transforms(&self) -> bool {
        self.encryption.is_some() || !self.encode.is_empty() || self.decode.is_some()
    }
}

/// Truthy rule shared by boolean directives: `1` or `true` in any case.
pub fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
