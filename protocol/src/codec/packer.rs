use bytes::{BufMut, BytesMut};

use super::{
    BIN8, BIN16, BIN32, FIXSTR_BASE, FIXSTR_MAX_LENGTH, STR8, STR16, STR32, UINT8, UINT16, UINT32,
};

/// Serializes primitive values into the compact length-prefixed wire
/// format. Width of each integer and length prefix is chosen by magnitude.
#[derive(Debug, Default)]
pub struct Packer {
    buf: BytesMut,
}

impl Packer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Pack a non-negative integer, 1 to 5 bytes on the wire.
    pub fn pack_uint(&mut self, value: u32) {
        if value < 1 << 7 {
            self.buf.put_u8(value as u8);
        } else if value < 1 << 8 {
            self.buf.put_u8(UINT8);
            self.buf.put_u8(value as u8);
        } else if value < 1 << 16 {
            self.buf.put_u8(UINT16);
            self.buf.put_u16(value as u16);
        } else {
            self.buf.put_u8(UINT32);
            self.buf.put_u32(value);
        }
    }

    /// Pack an opaque blob with a length prefix.
    pub fn pack_bin(&mut self, data: &[u8]) {
        if data.len() < 1 << 8 {
            self.buf.put_u8(BIN8);
            self.buf.put_u8(data.len() as u8);
        } else if data.len() < 1 << 16 {
            self.buf.put_u8(BIN16);
            self.buf.put_u16(data.len() as u16);
        } else {
            self.buf.put_u8(BIN32);
            self.buf.put_u32(data.len() as u32);
        }
        self.buf.put_slice(data);
    }

    /// Pack a string as length-prefixed UTF-8. The length prefix counts
    /// encoded bytes, not characters.
    pub fn pack_str(&mut self, value: &str) {
        let encoded = value.as_bytes();
        if encoded.len() <= FIXSTR_MAX_LENGTH {
            self.buf.put_u8(FIXSTR_BASE | encoded.len() as u8);
        } else if encoded.len() < 1 << 8 {
            self.buf.put_u8(STR8);
            self.buf.put_u8(encoded.len() as u8);
        } else if encoded.len() < 1 << 16 {
            self.buf.put_u8(STR16);
            self.buf.put_u16(encoded.len() as u16);
        } else {
            self.buf.put_u8(STR32);
            self.buf.put_u32(encoded.len() as u32);
        }
        self.buf.put_slice(encoded);
    }

    /// Everything packed so far. Used to compute an authentication tag
    /// over a message body before the tag itself is packed.
    pub fn packed(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}
