use super::{ensure_non_empty, pack_header, unpack_header};
use crate::codec::{Packer, Unpacker};
use crate::error::Result;

const MAGIC: u8 = b'q';

/// Opening message of an exchange, naming the user who wants a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    user_name: String,
}

impl Request {
    pub fn new(user_name: impl Into<String>) -> Result<Self> {
        let user_name = user_name.into();
        ensure_non_empty("user_name", &user_name)?;
        Ok(Self { user_name })
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut packer = Packer::new();
        pack_header(&mut packer, MAGIC);
        packer.pack_str(&self.user_name);
        packer.into_bytes()
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut unpacker = Unpacker::new(data);
        unpack_header(&mut unpacker, MAGIC)?;
        Self::new(unpacker.unpack_str()?)
    }
}
