use rsa::RsaPublicKey;
use rsa::traits::PublicKeyParts;
use sha1::{Digest, Sha1};

use crate::error::{ProtocolError, Result};

/// Length in bytes of a key fingerprint.
pub const FINGERPRINT_LENGTH: usize = 6;

/// Compact identifier of an RSA public key, carried inside a Challenge so
/// a client holding several private keys can pick the one the server
/// expects to answer.
///
/// Derived from the first bytes of a SHA-1 hash over the SSH wire encoding
/// of the key: three length-prefixed fields holding the literal `ssh-rsa`,
/// the public exponent and the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; FINGERPRINT_LENGTH]);

impl Fingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; FINGERPRINT_LENGTH] = bytes.try_into().map_err(|_| {
            ProtocolError::Malformed(format!(
                "fingerprint must be {FINGERPRINT_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn from_public_key(key: &RsaPublicKey) -> Self {
        let digest = Sha1::digest(ssh_encoding(key));
        let mut bytes = [0u8; FINGERPRINT_LENGTH];
        bytes.copy_from_slice(&digest[..FINGERPRINT_LENGTH]);
        Self(bytes)
    }

    /// True if this fingerprint identifies `key`.
    pub fn matches(&self, key: &RsaPublicKey) -> bool {
        *self == Self::from_public_key(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; FINGERPRINT_LENGTH]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LENGTH]) -> Self {
        Self(bytes)
    }
}

fn ssh_encoding(key: &RsaPublicKey) -> Vec<u8> {
    let mut buf = Vec::new();
    put_field(&mut buf, b"ssh-rsa");
    put_mpint(&mut buf, &key.e().to_bytes_be());
    put_mpint(&mut buf, &key.n().to_bytes_be());
    buf
}

fn put_field(buf: &mut Vec<u8>, value: &[u8]) {
    buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
    buf.extend_from_slice(value);
}

// A magnitude whose top bit is set gains a leading zero byte, matching the
// two's-complement form the SSH encoding uses for positive integers.
fn put_mpint(buf: &mut Vec<u8>, magnitude: &[u8]) {
    let pad = magnitude.first().is_some_and(|byte| byte & 0x80 != 0);
    let len = magnitude.len() + usize::from(pad);
    buf.extend_from_slice(&(len as u32).to_be_bytes());
    if pad {
        buf.push(0);
    }
    buf.extend_from_slice(magnitude);
}
