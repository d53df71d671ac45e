//! Block cipher transform: cipher + chaining mode + padding.
//!
//! # Design
//! Ciphers, modes and paddings are each looked up by name in a small table of
//! factories. A cipher factory produces a `CipherPair`: one keyed primitive
//! for encryption and an independently keyed one for decryption. A mode
//! factory wraps a primitive into a `BlockMode` that walks whole buffers.
//! Adding an algorithm means adding one table entry; `BlockTransform` and the
//! pipeline never branch on names.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit};
use aes::{Aes128Dec, Aes128Enc, Aes192Dec, Aes192Enc, Aes256Dec, Aes256Enc};

use crate::config::CipherSpec;
use crate::error::{ConfigError, TransformError};
use crate::padding::{padder_for, Padder};

/// A keyed single-block operation in one direction.
pub trait BlockPrimitive: Send + Sync {
    fn block_size(&self) -> usize;

    /// Process exactly one block in place.
    fn process_block(&self, block: &mut [u8]);
}

/// Extends a block primitive over a buffer whose length is a multiple of the
/// block size.
pub trait BlockMode: Send + Sync {
    fn block_size(&self) -> usize;
    fn crypt_blocks(&self, buf: &mut [u8]);
}

/// Encrypting and decrypting primitives built from the same key.
pub struct CipherPair {
    pub encrypt: Box<dyn BlockPrimitive>,
    pub decrypt: Box<dyn BlockPrimitive>,
}

struct Encrypting<C>(C);

impl<C: BlockEncrypt + Send + Sync> BlockPrimitive for Encrypting<C> {
    fn block_size(&self) -> usize {
        C::block_size()
    }

    fn process_block(&self, block: &mut [u8]) {
        self.0.encrypt_block(GenericArray::from_mut_slice(block));
    }
}

struct Decrypting<C>(C);

impl<C: BlockDecrypt + Send + Sync> BlockPrimitive for Decrypting<C> {
    fn block_size(&self) -> usize {
        C::block_size()
    }

    fn process_block(&self, block: &mut [u8]) {
        self.0.decrypt_block(GenericArray::from_mut_slice(block));
    }
}

fn keyed_pair<E, D>(algorithm: &'static str, key: &[u8]) -> Result<CipherPair, ConfigError>
where
    E: BlockEncrypt + KeyInit + Send + Sync + 'static,
    D: BlockDecrypt + KeyInit + Send + Sync + 'static,
{
    let invalid = |_| ConfigError::InvalidKeyLength {
        algorithm,
        len: key.len(),
    };
    Ok(CipherPair {
        encrypt: Box::new(Encrypting(E::new_from_slice(key).map_err(invalid)?)),
        decrypt: Box::new(Decrypting(D::new_from_slice(key).map_err(invalid)?)),
    })
}

fn aes(key: &[u8]) -> Result<CipherPair, ConfigError> {
    match key.len() {
        16 => keyed_pair::<Aes128Enc, Aes128Dec>("AES", key),
        24 => keyed_pair::<Aes192Enc, Aes192Dec>("AES", key),
        32 => keyed_pair::<Aes256Enc, Aes256Dec>("AES", key),
        len => Err(ConfigError::InvalidKeyLength {
            algorithm: "AES",
            len,
        }),
    }
}

/// Electronic codebook: every block processed independently, no IV.
struct Ecb {
    primitive: Box<dyn BlockPrimitive>,
}

impl BlockMode for Ecb {
    fn block_size(&self) -> usize {
        self.primitive.block_size()
    }

    fn crypt_blocks(&self, buf: &mut [u8]) {
        let block_size = self.block_size();
        for block in buf.chunks_exact_mut(block_size) {
            self.primitive.process_block(block);
        }
    }
}

fn ecb(primitive: Box<dyn BlockPrimitive>) -> Box<dyn BlockMode> {
    Box::new(Ecb { primitive })
}

type CipherFactory = fn(&[u8]) -> Result<CipherPair, ConfigError>;
type ModeFactory = fn(Box<dyn BlockPrimitive>) -> Box<dyn BlockMode>;

const CIPHERS: &[(&str, CipherFactory)] = &[("AES", aes)];
const MODES: &[(&str, ModeFactory)] = &[("ECB", ecb)];

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

/// Pure, reusable encrypt/decrypt over whole buffers.
pub struct BlockTransform {
    encrypter: Box<dyn BlockMode>,
    decrypter: Box<dyn BlockMode>,
    padder: Option<Box<dyn Padder>>,
}

impl std::fmt::Debug for BlockTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockTransform")
            .field("block_size", &self.block_size())
            .field("padded", &self.padder.is_some())
            .finish()
    }
}

impl BlockTransform {
    /// Resolve `spec` against the registries and key the cipher.
    ///
    /// Fails on an unknown algorithm, mode or padding name, or a key length
    /// the cipher does not accept. Names are checked before the key.
    pub fn new(key: &[u8], spec: &CipherSpec) -> Result<Self, ConfigError> {
        let cipher = lookup(CIPHERS, &spec.algorithm)
            .ok_or_else(|| ConfigError::UnknownCipher(spec.algorithm.clone()))?;
        let mode = lookup(MODES, &spec.mode)
            .ok_or_else(|| ConfigError::UnknownBlockMode(spec.mode.clone()))?;

        let pair = cipher(key)?;
        let block_size = pair.encrypt.block_size();
        let padder = padder_for(&spec.padding, block_size)?;

        Ok(Self {
            encrypter: mode(pair.encrypt),
            decrypter: mode(pair.decrypt),
            padder,
        })
    }

    pub fn block_size(&self) -> usize {
        self.encrypter.block_size()
    }

    fn check_aligned(&self, data: &[u8]) -> Result<(), TransformError> {
        let block_size = self.block_size();
        if data.len() % block_size != 0 {
            return Err(TransformError::Misaligned {
                len: data.len(),
                block_size,
            });
        }
        Ok(())
    }

    /// Pad (if configured) and encrypt into a fresh buffer.
    ///
    /// Without a padder the plaintext must already be block-aligned.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, TransformError> {
        let mut buf = match &self.padder {
            Some(padder) => padder.add(plaintext),
            None => {
                self.check_aligned(plaintext)?;
                plaintext.to_vec()
            }
        };
        self.encrypter.crypt_blocks(&mut buf);
        Ok(buf)
    }

    /// Decrypt a block-aligned buffer and strip padding (if configured).
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.check_aligned(ciphertext)?;
        let mut buf = ciphertext.to_vec();
        self.decrypter.crypt_blocks(&mut buf);
        match &self.padder {
            Some(padder) => Ok(padder.remove(&buf)?),
            None => Ok(buf),
        }
    }
}
