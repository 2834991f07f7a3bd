use super::{pack_header, unpack_header};
use crate::codec::{Packer, Unpacker};
use crate::error::Result;

const MAGIC: u8 = b'r';

/// Client's answer to a challenge: the untouched challenge bytes plus an
/// RSA signature over them. The challenge travels back whole because the
/// server keeps no record of having issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl Response {
    pub fn new(payload: Vec<u8>, signature: Vec<u8>) -> Self {
        Self { payload, signature }
    }

    /// The serialized, tagged challenge exactly as the server issued it.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut packer = Packer::new();
        pack_header(&mut packer, MAGIC);
        packer.pack_bin(&self.payload);
        packer.pack_bin(&self.signature);
        packer.into_bytes()
    }

    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut unpacker = Unpacker::new(data);
        unpack_header(&mut unpacker, MAGIC)?;
        let payload = unpacker.unpack_bin()?;
        let signature = unpacker.unpack_bin()?;
        Ok(Self { payload, signature })
    }
}
