use protocol::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("challenge names server '{actual}', expected '{expected}'")]
    ServerNameMismatch { expected: String, actual: String },

    #[error("client did not prove possession of the private key")]
    SignatureMismatch,

    #[error("challenge is outside its validity period")]
    ChallengeExpired,

    #[error("token is outside its validity period")]
    TokenExpired,

    #[error("token lifespan {lifespan}s exceeds the allowed maximum of {max}s")]
    TokenLifetimeExceeded { lifespan: u32, max: u32 },

    #[error("no public key found for user '{0}'")]
    KeyNotFound(String),

    #[error("signing failed: {0}")]
    Signer(String),
}
