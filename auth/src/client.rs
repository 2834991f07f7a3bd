use std::sync::Arc;

use protocol::{Challenge, Request, Response, encoding};

use crate::error::{AuthError, Result};
use crate::signer::Signer;

/// The client role of the protocol: answers challenges on behalf of one
/// named server.
///
/// The server name embedded in a challenge is checked before anything is
/// signed, so a challenge relayed from an unrelated server is refused
/// instead of answered.
pub struct AuthClient {
    signer: Arc<dyn Signer>,
    server_name: String,
}

impl AuthClient {
    pub fn new(signer: Arc<dyn Signer>, server_name: impl Into<String>) -> Self {
        Self {
            signer,
            server_name: server_name.into(),
        }
    }

    /// Encoded request for `user_name`, the opening message of an exchange.
    pub fn create_request(user_name: &str) -> Result<String> {
        let request = Request::new(user_name)?;
        Ok(encoding::encode(&request.serialize()))
    }

    /// Sign the encoded `challenge` and wrap it in an encoded response.
    ///
    /// The signature covers the raw challenge bytes exactly as received;
    /// they travel back inside the response untouched.
    pub fn create_response(&self, challenge: &str) -> Result<String> {
        let raw = encoding::decode(challenge)?;
        let challenge = Challenge::deserialize(&raw)?;
        if challenge.server_name() != self.server_name {
            return Err(AuthError::ServerNameMismatch {
                expected: self.server_name.clone(),
                actual: challenge.server_name().to_string(),
            });
        }
        let signature = self.signer.sign(&raw, challenge.fingerprint())?;
        let response = Response::new(raw, signature);
        Ok(encoding::encode(&response.serialize()))
    }
}
