//! Error types for the request pipeline.
//!
//! # Design
//! Configuration problems get their own enum because they must surface before
//! any network activity: `Pipeline::new` builds every transform stage up front
//! and returns `ConfigError` for anything unrecognized. Everything that can go
//! wrong while bytes are flowing is collected under `PipelineError`, which
//! also remembers the best-known HTTP status for exit-code reporting.

use thiserror::Error;

/// Invalid or unrecognized configuration, from flags or descriptor directives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cipher type not recognized: {0:?}")]
    UnknownCipher(String),

    #[error("block mode not recognized: {0:?}")]
    UnknownBlockMode(String),

    #[error("padding type not recognized: {0:?}")]
    UnknownPadding(String),

    #[error("invalid key length {len} for {algorithm}")]
    InvalidKeyLength { algorithm: &'static str, len: usize },

    /// Only `send`, `encode` and `decode` are supported.
    #[error("execution mode not recognized: {0:?} (expected send, encode or decode)")]
    UnknownMode(String),

    /// A header entry without a `name:value` separator.
    #[error("header entry must be name:value, got {0:?}")]
    InvalidHeader(String),

    /// A one-way codec (e.g. `crc32`) followed by another stage.
    #[error("codec {0:?} is one-way and must be the last encoding")]
    OneWayNotLast(String),
}

/// Padding removal failures.
///
/// The trailing pad bytes are never compared against the pad length; only
/// inputs that cannot be unpadded at all are rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaddingError {
    #[error("cannot remove padding from empty input")]
    Empty,

    #[error("padding length {pad} exceeds input length {len}")]
    Overrun { pad: usize, len: usize },
}

/// Block cipher transform failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("input length {len} is not a multiple of the block size {block_size}")]
    Misaligned { len: usize, block_size: usize },

    #[error(transparent)]
    Padding(#[from] PaddingError),
}

/// Codec failures on the inbound path.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The codec is a digest and has no inverse.
    #[error("codec {0:?} is one-way and cannot be decoded")]
    OneWay(String),

    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// The transport could not complete the round-trip.
#[derive(Debug, Error)]
#[error("transport failed (status {status}): {message}")]
pub struct TransportError {
    /// Status code if one was received, otherwise 0.
    pub status: u16,
    pub message: String,
}

/// Any failure while running the pipeline. Every variant is terminal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("URL must be provided")]
    MissingUrl,

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PipelineError {
    /// Best-known HTTP status at the point of failure, 0 if none.
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::Transport(e) => e.status,
            _ => 0,
        }
    }
}
