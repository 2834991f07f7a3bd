use std::collections::HashMap;

use rsa::RsaPublicKey;

use crate::error::{AuthError, Result};

/// Backend resolving a username to its registered RSA public key.
///
/// Lookup may hit disk or network. A missing user surfaces as
/// [`AuthError::KeyNotFound`]; the server decides per operation whether
/// that is an error or triggers the derived-fingerprint path.
pub trait KeyProvider: Send + Sync {
    fn get_key(&self, user_name: &str) -> Result<RsaPublicKey>;
}

/// Map-backed provider for tests and small static deployments.
#[derive(Debug, Default)]
pub struct InMemoryKeyProvider {
    keys: HashMap<String, RsaPublicKey>,
}

impl InMemoryKeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_key(&mut self, user_name: impl Into<String>, key: RsaPublicKey) {
        self.keys.insert(user_name.into(), key);
    }
}

impl KeyProvider for InMemoryKeyProvider {
    fn get_key(&self, user_name: &str) -> Result<RsaPublicKey> {
        self.keys
            .get(user_name)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound(user_name.to_string()))
    }
}
