use crate::error::{ProtocolError, Result};

use super::{
    BIN8, BIN16, BIN32, FIXINT_MAX, FIXSTR_BASE, STR8, STR16, STR32, UINT8, UINT16, UINT32,
};

/// Reads primitive values back out of a byte buffer, tracking how many
/// bytes have been consumed so a caller can authenticate the exact prefix
/// a message body occupied.
pub struct Unpacker<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Unpacker<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read a non-negative integer. The full u32 range decodes.
    pub fn unpack_uint(&mut self) -> Result<u32> {
        let tag = self.read_byte()?;
        match tag {
            0..=FIXINT_MAX => Ok(u32::from(tag)),
            UINT8 => Ok(u32::from(self.read_byte()?)),
            UINT16 => Ok(u32::from(self.read_u16()?)),
            UINT32 => self.read_u32(),
            _ => Err(ProtocolError::Malformed(format!(
                "attempted to read int but tag byte {tag:#04x} indicates another type"
            ))),
        }
    }

    /// Read an integer and narrow it to a single byte.
    pub fn unpack_byte(&mut self) -> Result<u8> {
        let value = self.unpack_uint()?;
        if value > 0xff {
            return Err(ProtocolError::Malformed(format!(
                "expected unsigned int <= 0xff, got {value}"
            )));
        }
        Ok(value as u8)
    }

    /// Read a length-prefixed opaque blob.
    pub fn unpack_bin(&mut self) -> Result<Vec<u8>> {
        let tag = self.read_byte()?;
        let len = match tag {
            BIN8 => usize::from(self.read_byte()?),
            BIN16 => usize::from(self.read_u16()?),
            BIN32 => self.read_u32()? as usize,
            _ => {
                return Err(ProtocolError::Malformed(format!(
                    "attempted to read bin but tag byte {tag:#04x} indicates another type"
                )));
            }
        };
        Ok(self.read_slice(len)?.to_vec())
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn unpack_str(&mut self) -> Result<String> {
        let tag = self.read_byte()?;
        let len = match tag {
            FIXSTR_BASE..=0xbf => usize::from(tag & 0x1f),
            STR8 => usize::from(self.read_byte()?),
            STR16 => usize::from(self.read_u16()?),
            STR32 => self.read_u32()? as usize,
            _ => {
                return Err(ProtocolError::Malformed(format!(
                    "attempted to read str but tag byte {tag:#04x} indicates another type"
                )));
            }
        };
        let raw = self.read_slice(len)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| ProtocolError::Malformed("string field is not valid UTF-8".to_string()))
    }

    /// Number of bytes consumed so far.
    pub fn bytes_read(&self) -> usize {
        self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(ProtocolError::DataOutOfBound)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(ProtocolError::DataOutOfBound)?;
        if end > self.data.len() {
            return Err(ProtocolError::DataOutOfBound);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Packer;
    use super::*;

    #[test]
    fn mixed_sequence_round_trips() {
        let mut packer = Packer::new();
        packer.pack_uint(1);
        packer.pack_uint(0x1234);
        packer.pack_bin(&[1, 2, 3]);
        packer.pack_str("server.example.com");
        packer.pack_uint(u32::MAX);
        let bytes = packer.into_bytes();

        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(unpacker.unpack_uint().unwrap(), 1);
        assert_eq!(unpacker.unpack_uint().unwrap(), 0x1234);
        assert_eq!(unpacker.unpack_bin().unwrap(), vec![1, 2, 3]);
        assert_eq!(unpacker.unpack_str().unwrap(), "server.example.com");
        assert_eq!(unpacker.unpack_uint().unwrap(), u32::MAX);
        assert!(!unpacker.has_remaining());
        assert_eq!(unpacker.bytes_read(), bytes.len());
    }

    #[test]
    fn empty_buffer_is_out_of_bound() {
        let mut unpacker = Unpacker::new(&[]);
        assert!(matches!(
            unpacker.unpack_uint(),
            Err(ProtocolError::DataOutOfBound)
        ));
    }

    #[test]
    fn truncated_payload_is_out_of_bound() {
        // bin declaring 20 bytes with only 3 behind it
        let data = [BIN8, 20, 1, 2, 3];
        let mut unpacker = Unpacker::new(&data);
        assert!(matches!(
            unpacker.unpack_bin(),
            Err(ProtocolError::DataOutOfBound)
        ));

        // uint32 cut short
        let data = [UINT32, 0x01, 0x02];
        let mut unpacker = Unpacker::new(&data);
        assert!(matches!(
            unpacker.unpack_uint(),
            Err(ProtocolError::DataOutOfBound)
        ));
    }

    #[test]
    fn wrong_tag_is_malformed() {
        let mut packer = Packer::new();
        packer.pack_bin(&[1, 2, 3]);
        let bytes = packer.into_bytes();

        let mut unpacker = Unpacker::new(&bytes);
        assert!(matches!(
            unpacker.unpack_str(),
            Err(ProtocolError::Malformed(_))
        ));
        let mut unpacker = Unpacker::new(&bytes);
        assert!(matches!(
            unpacker.unpack_uint(),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn unpack_byte_rejects_wide_values() {
        let mut packer = Packer::new();
        packer.pack_uint(0xff);
        let bytes = packer.into_bytes();
        assert_eq!(Unpacker::new(&bytes).unpack_byte().unwrap(), 0xff);

        let mut packer = Packer::new();
        packer.pack_uint(0x100);
        let bytes = packer.into_bytes();
        assert!(matches!(
            Unpacker::new(&bytes).unpack_byte(),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let data = [FIXSTR_BASE | 2, 0xff, 0xfe];
        let mut unpacker = Unpacker::new(&data);
        assert!(matches!(
            unpacker.unpack_str(),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn bytes_read_tracks_consumed_prefix() {
        let mut packer = Packer::new();
        packer.pack_uint(1);
        packer.pack_str("abc");
        packer.pack_bin(&[9; 4]);
        let bytes = packer.into_bytes();

        let mut unpacker = Unpacker::new(&bytes);
        unpacker.unpack_uint().unwrap();
        assert_eq!(unpacker.bytes_read(), 1);
        unpacker.unpack_str().unwrap();
        assert_eq!(unpacker.bytes_read(), 5);
        unpacker.unpack_bin().unwrap();
        assert_eq!(unpacker.bytes_read(), bytes.len());
    }
}
