//! Request-descriptor pipeline core.
//!
//! # Overview
//! Turns raw input text into an HTTP request and back. The leading
//! `KEY=VALUE` lines of the input configure the request; the rest is the
//! body, which may be encrypted with a block cipher and encoded on the way
//! out, and decoded and decrypted on the way back in.
//!
//! # Design
//! - No I/O: the host reads input, writes output and executes the request
//!   through the `Transport` trait (host-does-IO pattern).
//! - Ciphers, block modes, paddings and codecs are registered by name in
//!   small factory tables; the pipeline never branches on algorithm names.
//! - Every unrecognized name is a typed `ConfigError` raised by
//!   `Pipeline::new`, before any request is sent.

pub mod cipher;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod padding;
pub mod pipeline;

pub use cipher::BlockTransform;
pub use codec::{CodecChain, Decoder};
pub use config::{CipherSpec, ExecutionMode, RequestConfig};
pub use descriptor::parse_descriptor;
pub use error::{CodecError, ConfigError, PaddingError, PipelineError, TransformError, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use pipeline::{Outcome, Pipeline, Stage, StageTrace};

/// Apply the descriptor block of `input` on top of `config` (typically built
/// from command-line flags) and split off the body.
pub fn prepare(mut config: RequestConfig, input: &[u8]) -> Result<(RequestConfig, Vec<u8>), ConfigError> {
    let body = parse_descriptor(&mut config, input)?;
    Ok((config, body))
}
