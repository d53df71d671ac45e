//! Command-line flags.
//!
//! Flags seed the request configuration; directives at the top of the input
//! file override them.

use clap::Parser;
use reqpipe_core::{CipherSpec, ConfigError, ExecutionMode, RequestConfig};

fn parse_mode(s: &str) -> Result<ExecutionMode, ConfigError> {
    s.parse()
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "reqpipe",
    version,
    about = "Send a request described by a text file, with optional encryption and encoding of the body"
)]
pub struct Args {
    /// URL to send the request to
    #[arg(long, default_value = "")]
    pub url: String,

    /// Execution mode: send, encode or decode
    #[arg(long, default_value = "send", value_parser = parse_mode)]
    pub mode: ExecutionMode,

    /// HTTP method to use
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// Comma separated headers in name:value format, e.g. Content-Type:application/xml,Accept:application/xml
    #[arg(long, default_value = "")]
    pub headers: String,

    /// File to read the request from; standard input if empty
    #[arg(long, default_value = "request.txt")]
    pub input: String,

    /// File to write the response to; standard output if empty
    #[arg(long, default_value = "response.txt")]
    pub output: String,

    /// Exit with the HTTP status instead of writing it as the first output line
    #[arg(long)]
    pub exit_as_return_code: bool,

    /// Log parsed options and every transform stage
    #[arg(long)]
    pub verbose: bool,

    /// Cipher key for encryption and decryption
    #[arg(long, default_value = "")]
    pub cipher_key: String,

    /// Cipher as ALGORITHM/MODE/PADDING; only AES/ECB/PKCS5PADDING is supported
    #[arg(long, default_value = "")]
    pub encrypt: String,

    /// Comma separated encodings applied after encryption (base64, crc32)
    #[arg(long, default_value = "")]
    pub encode: String,

    /// Decoding applied to the response before decryption (base64)
    #[arg(long, default_value = "")]
    pub decode: String,

    /// Overall request timeout in seconds; none by default
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Args {
    /// Initial configuration, before the input's directives are applied.
    pub fn to_config(&self) -> Result<RequestConfig, ConfigError> {
        let mut config = RequestConfig {
            url: self.url.clone(),
            method: self.method.clone(),
            mode: self.mode,
            exit_as_return_code: self.exit_as_return_code,
            verbose: self.verbose,
            cipher_key: self.cipher_key.as_bytes().to_vec(),
            encryption: CipherSpec::parse(&self.encrypt),
            ..Default::default()
        };
        config.add_headers(&self.headers)?;
        config.set_encode(&self.encode);
        config.set_decode(&self.decode);
        Ok(config)
    }
}
