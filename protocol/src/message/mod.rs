mod challenge;
mod request;
mod response;
mod token;

pub use challenge::{Challenge, UNIQUE_DATA_LENGTH};
pub use request::Request;
pub use response::Response;
pub use token::Token;

use crate::codec::{Packer, Unpacker};
use crate::error::{ProtocolError, Result};

/// Version byte opening every message.
pub const PROTOCOL_VERSION: u8 = 1;

// First bytes of the retired generation-zero encodings. Recognizing them
// lets decode errors tell a stale peer apart from a corrupt message.
const OBSOLETE_VERSION_BYTES: [u8; 2] = [b'v', b'r'];

pub(crate) fn pack_header(packer: &mut Packer, magic: u8) {
    packer.pack_uint(u32::from(PROTOCOL_VERSION));
    packer.pack_uint(u32::from(magic));
}

pub(crate) fn unpack_header(unpacker: &mut Unpacker<'_>, expected_magic: u8) -> Result<()> {
    let version = unpacker.unpack_byte()?;
    if version != PROTOCOL_VERSION {
        if OBSOLETE_VERSION_BYTES.contains(&version) {
            return Err(ProtocolError::ObsoleteVersion(version));
        }
        return Err(ProtocolError::UnsupportedVersion(version));
    }
    let magic = unpacker.unpack_byte()?;
    if magic != expected_magic {
        return Err(ProtocolError::Malformed(format!(
            "invalid magic byte, expected {expected_magic:#04x} but got {magic:#04x}"
        )));
    }
    Ok(())
}

fn ensure_window(valid_from: u32, valid_to: u32) -> Result<()> {
    if valid_from >= valid_to {
        return Err(ProtocolError::Malformed(format!(
            "validity window is empty: valid_from {valid_from} >= valid_to {valid_to}"
        )));
    }
    Ok(())
}

fn ensure_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProtocolError::Malformed(format!(
            "field '{field}' must not be empty"
        )));
    }
    Ok(())
}

// Whether `now` falls outside a closed validity window.
fn outside_window(valid_from: u32, valid_to: u32, now: u32) -> bool {
    now < valid_from || now > valid_to
}
