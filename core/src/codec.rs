//! Text encodings and digests applied after encryption.
//!
//! The outbound side takes an ordered list of codec names; the inbound side
//! takes exactly one. `crc32` is a digest, so it may only close the outbound
//! list and can never be decoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

use crate::error::{CodecError, ConfigError};
use crate::pipeline::StageTrace;

pub trait Codec: Send + Sync {
    fn name(&self) -> &'static str;

    /// Label used in stage traces, e.g. `Base64 encoded`.
    fn label(&self) -> &'static str;

    fn encode(&self, data: &[u8]) -> Vec<u8>;
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn is_reversible(&self) -> bool {
        true
    }
}

/// Standard padded base64 alphabet.
#[derive(Debug, Clone, Copy)]
pub struct Base64;

impl Codec for Base64 {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn label(&self) -> &'static str {
        "Base64 encoded"
    }

    fn encode(&self, data: &[u8]) -> Vec<u8> {
        STANDARD.encode(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(STANDARD.decode(data)?)
    }
}

/// IEEE CRC-32 rendered as a decimal string. One-way.
#[derive(Debug, Clone, Copy)]
pub struct Crc32;

impl Codec for Crc32 {
    fn name(&self) -> &'static str {
        "crc32"
    }

    fn label(&self) -> &'static str {
        "Crc32 checksum"
    }

    fn encode(&self, data: &[u8]) -> Vec<u8> {
        crc32fast::hash(data).to_string().into_bytes()
    }

    fn decode(&self, _data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::OneWay(self.name().to_string()))
    }

    fn is_reversible(&self) -> bool {
        false
    }
}

type CodecFactory = fn() -> Box<dyn Codec>;

fn base64() -> Box<dyn Codec> {
    Box::new(Base64)
}

fn crc32() -> Box<dyn Codec> {
    Box::new(Crc32)
}

const CODECS: &[(&str, CodecFactory)] = &[("base64", base64), ("crc32", crc32)];

/// Look up a codec by name. `None` for unknown names.
pub fn codec_for(name: &str) -> Option<Box<dyn Codec>> {
    CODECS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, factory)| factory())
}

/// Ordered outbound encodings.
#[derive(Default)]
pub struct CodecChain {
    stages: Vec<Box<dyn Codec>>,
}

impl std::fmt::Debug for CodecChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|c| c.name()))
            .finish()
    }
}

impl CodecChain {
    /// Build a chain from codec names. Unknown names are skipped with a
    /// warning; a one-way codec anywhere but last is rejected.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut stages: Vec<Box<dyn Codec>> = Vec::with_capacity(names.len());
        for name in names.iter().map(AsRef::as_ref).filter(|n| !n.is_empty()) {
            let Some(codec) = codec_for(name) else {
                warn!("ignoring unknown encoding {name:?}");
                continue;
            };
            if let Some(prev) = stages.last() {
                if !prev.is_reversible() {
                    return Err(ConfigError::OneWayNotLast(prev.name().to_string()));
                }
            }
            stages.push(codec);
        }
        Ok(Self { stages })
    }

    /// Parse a comma-separated list such as `base64,crc32`.
    pub fn parse(list: &str) -> Result<Self, ConfigError> {
        let names: Vec<&str> = list.split(',').collect();
        Self::from_names(&names)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether every stage can be inverted.
    pub fn is_reversible(&self) -> bool {
        self.one_way_stage().is_none()
    }

    /// Name of the first one-way stage, if any.
    pub fn one_way_stage(&self) -> Option<&'static str> {
        self.stages
            .iter()
            .find(|c| !c.is_reversible())
            .map(|c| c.name())
    }

    /// Apply every stage left to right.
    pub fn encode(&self, data: Vec<u8>, trace: &mut StageTrace) -> Vec<u8> {
        self.stages.iter().fold(data, |data, codec| {
            let encoded = codec.encode(&data);
            trace.record(codec.label(), &encoded);
            encoded
        })
    }

    /// Invert the whole chain right to left. Refuses chains containing a
    /// one-way stage before touching the data.
    pub fn decode(&self, data: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        if let Some(name) = self.one_way_stage() {
            return Err(CodecError::OneWay(name.to_string()));
        }
        self.stages
            .iter()
            .rev()
            .try_fold(data, |data, codec| codec.decode(&data))
    }
}

/// The single inbound decoding.
pub struct Decoder {
    codec: Option<Box<dyn Codec>>,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Decoder")
            .field(&self.codec.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl Decoder {
    /// An unknown name yields a pass-through decoder, mirroring the outbound
    /// side. A one-way name is accepted here and fails on first use.
    pub fn from_name(name: &str) -> Self {
        let codec = codec_for(name);
        if codec.is_none() {
            warn!("ignoring unknown decoding {name:?}");
        }
        Self { codec }
    }

    pub fn decode(&self, data: Vec<u8>, trace: &mut StageTrace) -> Result<Vec<u8>, CodecError> {
        let Some(codec) = &self.codec else {
            return Ok(data);
        };
        let decoded = codec.decode(&data)?;
        trace.record(&format!("{} decoded", codec.name()), &decoded);
        Ok(decoded)
    }
}
