use super::{ensure_non_empty, ensure_window, outside_window, pack_header, unpack_header};
use crate::codec::{Packer, Unpacker};
use crate::digest;
use crate::error::{ProtocolError, Result};

const MAGIC: u8 = b't';

/// Credential issued after a verified exchange, asserting a username and a
/// validity window. Resource servers accept it on the strength of its
/// authentication tag alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    valid_from: u32,
    valid_to: u32,
    user_name: String,
}

impl Token {
    pub fn new(valid_from: u32, valid_to: u32, user_name: impl Into<String>) -> Result<Self> {
        let user_name = user_name.into();
        ensure_window(valid_from, valid_to)?;
        ensure_non_empty("user_name", &user_name)?;
        Ok(Self {
            valid_from,
            valid_to,
            user_name,
        })
    }

    pub fn valid_from(&self) -> u32 {
        self.valid_from
    }

    pub fn valid_to(&self) -> u32 {
        self.valid_to
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn is_expired(&self, now: u32) -> bool {
        outside_window(self.valid_from, self.valid_to, now)
    }

    /// Seconds the token claims to be valid for. The constructor keeps the
    /// window non-empty, so this never underflows.
    pub fn lifespan(&self) -> u32 {
        self.valid_to - self.valid_from
    }

    /// Serialized token with an authentication tag appended over the body
    /// bytes.
    pub fn serialize(&self, secret: &[u8]) -> Vec<u8> {
        let mut packer = Packer::new();
        pack_header(&mut packer, MAGIC);
        packer.pack_uint(self.valid_from);
        packer.pack_uint(self.valid_to);
        packer.pack_str(&self.user_name);
        let mac = digest::authentication_code(secret, packer.packed());
        packer.pack_bin(&mac);
        packer.into_bytes()
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        Self::unpack_body(&mut Unpacker::new(data))
    }

    /// Decode and verify the trailing tag against `secret` in constant
    /// time.
    pub fn deserialize_authenticated(data: &[u8], secret: &[u8]) -> Result<Self> {
        let mut unpacker = Unpacker::new(data);
        let token = Self::unpack_body(&mut unpacker)?;
        let body_len = unpacker.bytes_read();
        let tag = unpacker.unpack_bin()?;
        if !digest::verify_authentication_code(secret, &data[..body_len], &tag) {
            return Err(ProtocolError::MacMismatch);
        }
        Ok(token)
    }

    fn unpack_body(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        unpack_header(unpacker, MAGIC)?;
        let valid_from = unpacker.unpack_uint()?;
        let valid_to = unpacker.unpack_uint()?;
        let user_name = unpacker.unpack_str()?;
        Self::new(valid_from, valid_to, user_name)
    }
}
