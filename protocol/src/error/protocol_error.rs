use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("attempted to read past end of buffer")]
    DataOutOfBound,

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("peer sent a version {0} message, only version 1 is supported; upgrade the peer")]
    ObsoleteVersion(u8),

    #[error("unsupported protocol version {0}, only version 1 is supported")]
    UnsupportedVersion(u8),

    #[error("message authentication failed")]
    MacMismatch,

    #[error("invalid transport encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
}
