//! Descriptor block parser.
//!
//! # Design
//! The input's leading lines may be `KEY=VALUE` directives that configure the
//! request. Scanning is greedy and one-way: the first line that does not
//! match the directive pattern, or that names an unknown key, starts the
//! body, and nothing after it is ever interpreted, even if it looks like a
//! directive.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::{parse_flag, CipherSpec, RequestConfig};
use crate::error::ConfigError;

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([A-Z_]+)=([A-Za-z0-9.,: /-]+)\s*$").expect("directive pattern is valid")
    })
}

/// A recognized directive key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Url,
    Method,
    Headers,
    ExitAsReturnCode,
    Verbose,
    CipherKey,
    Encryption,
    Encode,
    Decode,
    Mode,
}

impl Directive {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "URL" => Directive::Url,
            "METHOD" => Directive::Method,
            "HEADERS" => Directive::Headers,
            "EXIT_AS_RETURN_CODE" => Directive::ExitAsReturnCode,
            "VERBOSE" => Directive::Verbose,
            "CIPHER_KEY" => Directive::CipherKey,
            "ENCRYPTION" => Directive::Encryption,
            "ENCODE" => Directive::Encode,
            "DECODE" => Directive::Decode,
            "MODE" => Directive::Mode,
            _ => return None,
        })
    }

    /// Apply this directive's value to `config`.
    pub fn apply(self, config: &mut RequestConfig, value: &str) -> Result<(), ConfigError> {
        match self {
            Directive::Url => config.url = value.to_string(),
            Directive::Method => config.method = value.to_string(),
            Directive::Headers => config.add_headers(value)?,
            Directive::ExitAsReturnCode => config.exit_as_return_code = parse_flag(value),
            Directive::Verbose => config.verbose = parse_flag(value),
            Directive::CipherKey => config.cipher_key = value.as_bytes().to_vec(),
            Directive::Encryption => config.encryption = CipherSpec::parse(value),
            Directive::Encode => config.set_encode(value),
            Directive::Decode => config.set_decode(value),
            Directive::Mode => config.mode = value.parse()?,
        }
        Ok(())
    }
}

/// Match one line against the directive pattern and vocabulary.
///
/// Spaces are legal inside values, so trailing blanks are trimmed off the
/// captured value.
pub fn parse_directive(line: &str) -> Option<(Directive, &str)> {
    let caps = directive_pattern().captures(line)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().trim_end();
    Directive::from_key(key).map(|d| (d, value))
}

/// Consume the descriptor block of `input`, updating `config`, and return the
/// body: the raw bytes from the first non-directive line onward. Only
/// directive lines are read as text; a line that is not valid UTF-8 starts
/// the body. If every line is a directive the body is empty.
pub fn parse_descriptor(config: &mut RequestConfig, input: &[u8]) -> Result<Vec<u8>, ConfigError> {
    let mut offset = 0;
    while offset < input.len() {
        let end = input[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(input.len(), |i| offset + i);
        let directive = std::str::from_utf8(&input[offset..end])
            .ok()
            .and_then(parse_directive);
        let Some((directive, value)) = directive else {
            return Ok(input[offset..].to_vec());
        };
        directive.apply(config, value)?;
        offset = end + 1;
    }
    Ok(Vec::new())
}
