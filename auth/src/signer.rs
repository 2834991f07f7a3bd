use protocol::Fingerprint;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};

use crate::error::{AuthError, Result};

/// Capability to sign challenge bytes with the private key matching a
/// fingerprint. Implementations may hold keys directly or delegate to an
/// external signing agent.
pub trait Signer: Send + Sync {
    fn sign(&self, data: &[u8], fingerprint: &Fingerprint) -> Result<Vec<u8>>;
}

/// Signer backed by a single local private key. Refuses challenges whose
/// fingerprint names some other key.
pub struct SingleKeySigner {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl SingleKeySigner {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        let public_key = private_key.to_public_key();
        Self {
            private_key,
            public_key,
        }
    }
}

impl Signer for SingleKeySigner {
    fn sign(&self, data: &[u8], fingerprint: &Fingerprint) -> Result<Vec<u8>> {
        if !fingerprint.matches(&self.public_key) {
            return Err(AuthError::KeyNotFound(
                "no private key matches the challenge fingerprint".to_string(),
            ));
        }
        self.private_key
            .sign(Pkcs1v15Sign::new::<Sha1>(), Sha1::digest(data).as_slice())
            .map_err(|e| AuthError::Signer(e.to_string()))
    }
}
