//! Block cipher padding schemes.

use crate::error::{ConfigError, PaddingError};

/// Adds and removes padding around block cipher input.
pub trait Padder: Send + Sync {
    fn add(&self, data: &[u8]) -> Vec<u8>;
    fn remove(&self, data: &[u8]) -> Result<Vec<u8>, PaddingError>;
}

/// PKCS#5/PKCS#7: `n` bytes of value `n`, `1 <= n <= block_size`.
///
/// Aligned input still receives a full block of padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pkcs5 {
    pub block_size: usize,
}

impl Padder for Pkcs5 {
    fn add(&self, data: &[u8]) -> Vec<u8> {
        let n = self.block_size - data.len() % self.block_size;
        let mut padded = Vec::with_capacity(data.len() + n);
        padded.extend_from_slice(data);
        padded.resize(data.len() + n, n as u8);
        padded
    }

    /// Strips as many bytes as the last byte says. The stripped bytes are not
    /// checked against that value, so malformed padding from a third party
    /// still unpads.
    fn remove(&self, data: &[u8]) -> Result<Vec<u8>, PaddingError> {
        let Some(&last) = data.last() else {
            return Err(PaddingError::Empty);
        };
        let pad = last as usize;
        if pad > data.len() {
            return Err(PaddingError::Overrun {
                pad,
                len: data.len(),
            });
        }
        Ok(data[..data.len() - pad].to_vec())
    }
}

type PaddingFactory = fn(usize) -> Box<dyn Padder>;

fn pkcs5(block_size: usize) -> Box<dyn Padder> {
    Box::new(Pkcs5 { block_size })
}

const PADDINGS: &[(&str, PaddingFactory)] = &[("PKCS5", pkcs5), ("PKCS7", pkcs5)];

/// Look up a padding scheme by name.
///
/// Returns `Ok(None)` for the empty name and for `NO` (`NoPadding` with the
/// suffix stripped): the transform then runs without a padding stage.
pub fn padder_for(name: &str, block_size: usize) -> Result<Option<Box<dyn Padder>>, ConfigError> {
    if name.is_empty() || name == "NO" {
        return Ok(None);
    }
    PADDINGS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, factory)| Some(factory(block_size)))
        .ok_or_else(|| ConfigError::UnknownPadding(name.to_string()))
}
