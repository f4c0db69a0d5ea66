//! # Frame Encryption
//!
//! AES-CBC wrapping of checksummed frames for the multicast channel.
//!
//! ## Packet Format
//! ```text
//! [AlgorithmId(1)] [Ciphertext(16*n)] [IV(16)]
//! ```
//! The plaintext is the frame without its packet-type byte, zero-filled to a
//! multiple of the AES block size. Padding is not removed on decryption; the
//! receiver knows the real length from the frame's size field.
//!
//! ## Security
//! - Fresh IV from the OS CSPRNG (getrandom) on every call
//! - Unknown scheme identifiers are rejected, never mapped to a default
//! - Key bytes are zeroed on drop (zeroize)

use crate::core::frame::Frame;
use crate::error::{constants, ProtocolError, Result};
use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// AES block size, also the IV length
pub const BLOCK_SIZE: usize = 16;

/// Length of the IV appended to every encrypted packet
pub const IV_LENGTH: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encryption applied to a frame before it is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionKind {
    /// Frame is sent as-is
    #[default]
    None,
    Aes128,
    Aes192,
    Aes256,
}

impl EncryptionKind {
    /// Identifier byte written in front of an encrypted packet
    pub fn id(self) -> u8 {
        match self {
            EncryptionKind::None => 0,
            EncryptionKind::Aes128 => 1,
            EncryptionKind::Aes192 => 2,
            EncryptionKind::Aes256 => 3,
        }
    }

    /// Map an identifier byte back to a scheme
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(EncryptionKind::None),
            1 => Ok(EncryptionKind::Aes128),
            2 => Ok(EncryptionKind::Aes192),
            3 => Ok(EncryptionKind::Aes256),
            other => Err(ProtocolError::UnsupportedScheme(format!("identifier {other}"))),
        }
    }

    /// Required key length in bytes
    pub fn key_len(self) -> usize {
        match self {
            EncryptionKind::None => 0,
            EncryptionKind::Aes128 => 16,
            EncryptionKind::Aes192 => 24,
            EncryptionKind::Aes256 => 32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncryptionKind::None => "none",
            EncryptionKind::Aes128 => "aes128",
            EncryptionKind::Aes192 => "aes192",
            EncryptionKind::Aes256 => "aes256",
        }
    }

    pub fn is_encrypted(self) -> bool {
        self != EncryptionKind::None
    }
}

impl fmt::Display for EncryptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncryptionKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(EncryptionKind::None),
            "aes128" | "1" => Ok(EncryptionKind::Aes128),
            "aes192" | "2" => Ok(EncryptionKind::Aes192),
            "aes256" | "3" => Ok(EncryptionKind::Aes256),
            other => Err(ProtocolError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// A scheme paired with key bytes of the matching length
#[derive(Clone)]
pub struct EncryptionKey {
    kind: EncryptionKind,
    key: Zeroizing<Vec<u8>>,
}

impl EncryptionKey {
    /// Validate `key` against the length `kind` requires
    pub fn new(kind: EncryptionKind, key: &[u8]) -> Result<Self> {
        if key.len() != kind.key_len() {
            return Err(ProtocolError::InvalidKey {
                expected: kind.key_len(),
                actual: key.len(),
            });
        }
        Ok(Self {
            kind,
            key: Zeroizing::new(key.to_vec()),
        })
    }

    /// Parse hex-encoded key material
    pub fn from_hex(kind: EncryptionKind, hex_key: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_key.trim())
                .map_err(|_| ProtocolError::ConfigError(constants::ERR_KEY_NOT_HEX.to_string()))?,
        );
        Self::new(kind, &bytes)
    }

    /// Pass-through "key" for unencrypted operation
    pub fn none() -> Self {
        Self {
            kind: EncryptionKind::None,
            key: Zeroizing::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> EncryptionKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("kind", &self.kind)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Bytes handed to the transport: a raw frame or an encrypted wrapping of one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    kind: EncryptionKind,
    bytes: Bytes,
}

impl Packet {
    pub fn kind(&self) -> EncryptionKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Generate a random IV from the OS entropy source
pub fn generate_iv() -> Result<[u8; IV_LENGTH]> {
    let mut iv = [0u8; IV_LENGTH];
    getrandom::fill(&mut iv).map_err(|e| ProtocolError::EntropySource(e.to_string()))?;
    Ok(iv)
}

/// Length of an encrypted packet wrapping a frame of `frame_len` bytes
pub fn encrypted_len(frame_len: usize) -> usize {
    1 + padded_len(frame_len.saturating_sub(1)) + IV_LENGTH
}

#[inline]
fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Encrypt `frame` under `kind` with raw key bytes
pub fn encrypt_frame(frame: &Frame, kind: EncryptionKind, key: &[u8]) -> Result<Packet> {
    if !kind.is_encrypted() {
        return Ok(Packet {
            kind,
            bytes: frame.clone().into_bytes(),
        });
    }
    encrypt_with_key(frame, &EncryptionKey::new(kind, key)?)
}

/// Encrypt `frame` with a validated key. The frame itself is left untouched.
pub fn encrypt_with_key(frame: &Frame, key: &EncryptionKey) -> Result<Packet> {
    if !key.kind().is_encrypted() {
        return Ok(Packet {
            kind: EncryptionKind::None,
            bytes: frame.clone().into_bytes(),
        });
    }
    let iv = generate_iv()?;
    let bytes = seal(frame.as_bytes(), key, &iv)?;
    Ok(Packet {
        kind: key.kind(),
        bytes,
    })
}

fn seal(frame: &[u8], key: &EncryptionKey, iv: &[u8; IV_LENGTH]) -> Result<Bytes> {
    let body = frame.get(1..).unwrap_or_default();
    let mut plain = Zeroizing::new(body.to_vec());
    plain.resize(padded_len(body.len()), 0);

    let k = key.as_bytes();
    let invalid = |_| ProtocolError::InvalidKey {
        expected: key.kind().key_len(),
        actual: k.len(),
    };
    let ciphertext = match key.kind() {
        EncryptionKind::Aes128 => Aes128CbcEnc::new_from_slices(k, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<NoPadding>(&plain),
        EncryptionKind::Aes192 => Aes192CbcEnc::new_from_slices(k, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<NoPadding>(&plain),
        EncryptionKind::Aes256 => Aes256CbcEnc::new_from_slices(k, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<NoPadding>(&plain),
        EncryptionKind::None => return Err(ProtocolError::EncryptionFailure),
    };

    if ciphertext.len() != plain.len() {
        return Err(ProtocolError::EncryptionFailure);
    }

    let mut out = BytesMut::with_capacity(1 + ciphertext.len() + IV_LENGTH);
    out.put_u8(key.kind().id());
    out.put_slice(&ciphertext);
    out.put_slice(iv);
    Ok(out.freeze())
}

/// Recover the zero-padded frame body (everything after the packet-type byte).
///
/// Padding is left in place and the frame is not parsed.
pub fn decrypt_packet(packet: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    if packet.len() < 1 + IV_LENGTH {
        return Err(ProtocolError::DecryptionFailure(
            constants::ERR_PACKET_TOO_SHORT.to_string(),
        ));
    }

    let kind = EncryptionKind::from_id(packet[0])?;
    if kind != key.kind() || !kind.is_encrypted() {
        return Err(ProtocolError::UnsupportedScheme(format!(
            "packet uses {kind}, key is {}",
            key.kind()
        )));
    }

    let (ciphertext, iv) = packet[1..].split_at(packet.len() - 1 - IV_LENGTH);
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(ProtocolError::DecryptionFailure(
            constants::ERR_MISALIGNED_CIPHERTEXT.to_string(),
        ));
    }

    let k = key.as_bytes();
    let invalid = |_| ProtocolError::InvalidKey {
        expected: kind.key_len(),
        actual: k.len(),
    };
    let failed = |_| ProtocolError::DecryptionFailure(constants::ERR_DECRYPTION_FAILED.to_string());
    match kind {
        EncryptionKind::Aes128 => Aes128CbcDec::new_from_slices(k, iv)
            .map_err(invalid)?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(failed),
        EncryptionKind::Aes192 => Aes192CbcDec::new_from_slices(k, iv)
            .map_err(invalid)?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(failed),
        EncryptionKind::Aes256 => Aes256CbcDec::new_from_slices(k, iv)
            .map_err(invalid)?
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(failed),
        EncryptionKind::None => Err(ProtocolError::DecryptionFailure(
            constants::ERR_DECRYPTION_FAILED.to_string(),
        )),
    }
}
