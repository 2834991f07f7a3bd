pub mod codec;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod fingerprint;
pub mod message;

pub use codec::{Packer, Unpacker};
pub use error::{ProtocolError, Result};
pub use fingerprint::{FINGERPRINT_LENGTH, Fingerprint};
pub use message::{
    Challenge, PROTOCOL_VERSION, Request, Response, Token, UNIQUE_DATA_LENGTH,
};
