mod packer;
mod unpacker;

pub use packer::Packer;
pub use unpacker::Unpacker;

// Format tag bytes, following the msgpack encoding for positive integers,
// raw binary and UTF-8 strings.
pub(crate) const FIXINT_MAX: u8 = 0x7f;
pub(crate) const BIN8: u8 = 0xc4;
pub(crate) const BIN16: u8 = 0xc5;
pub(crate) const BIN32: u8 = 0xc6;
pub(crate) const UINT8: u8 = 0xcc;
pub(crate) const UINT16: u8 = 0xcd;
pub(crate) const UINT32: u8 = 0xce;
pub(crate) const FIXSTR_BASE: u8 = 0xa0;
pub(crate) const FIXSTR_MAX_LENGTH: usize = 31;
pub(crate) const STR8: u8 = 0xd9;
pub(crate) const STR16: u8 = 0xda;
pub(crate) const STR32: u8 = 0xdb;
