use std::sync::Arc;

use protocol::{
    Challenge, FINGERPRINT_LENGTH, Fingerprint, Request, Response, Token, UNIQUE_DATA_LENGTH,
    digest, encoding,
};
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha1::{Digest, Sha1};
use tracing::{debug, info};

use crate::error::{AuthError, Result};
use crate::key_provider::KeyProvider;
use crate::random::{OsRandom, RandomSource};
use crate::time::{Clock, SystemClock};

/// Tolerated clock skew between peers, in seconds. Validity windows start
/// this much in the past.
pub const CLOCK_FUDGE: u32 = 2;

/// How long a client gets to answer a challenge, in seconds.
pub const RESPONSE_TIMEOUT: u32 = 20;

/// Hard ceiling on the configurable token lifetime, in seconds.
pub const MAX_TOKEN_LIFETIME: u32 = 600;

const DEFAULT_TOKEN_LIFETIME: u32 = 60;

/// Server-side configuration, assembled once and shared read-only across
/// concurrent exchanges. Clock and randomness default to the system
/// implementations but are ordinary substitutable fields.
pub struct ServerConfig {
    pub server_name: String,
    pub secret: Vec<u8>,
    pub key_providers: Vec<Arc<dyn KeyProvider>>,
    pub token_lifetime: u32,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
}

impl ServerConfig {
    pub fn new(
        server_name: impl Into<String>,
        secret: impl Into<Vec<u8>>,
        key_providers: Vec<Arc<dyn KeyProvider>>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            secret: secret.into(),
            key_providers,
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            clock: Arc::new(SystemClock),
            random: Arc::new(OsRandom),
        }
    }

    pub fn with_token_lifetime(mut self, seconds: u32) -> Self {
        self.token_lifetime = seconds;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }
}

/// The server role of the protocol.
///
/// Holds no per-exchange state: every message a client sends back carries
/// its own authentication tag, so any instance sharing the same secret and
/// key backends can serve any step of any exchange.
pub struct AuthServer {
    server_name: String,
    secret: Vec<u8>,
    key_providers: Vec<Arc<dyn KeyProvider>>,
    token_lifetime: u32,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl AuthServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.server_name.is_empty() {
            return Err(AuthError::Config("server name must not be empty".to_string()));
        }
        if config.secret.is_empty() {
            return Err(AuthError::Config("secret must not be empty".to_string()));
        }
        if config.key_providers.is_empty() {
            return Err(AuthError::Config(
                "at least one key provider is required".to_string(),
            ));
        }
        if config.token_lifetime == 0 || config.token_lifetime > MAX_TOKEN_LIFETIME {
            return Err(AuthError::Config(format!(
                "token lifetime must be within 1..={MAX_TOKEN_LIFETIME} seconds"
            )));
        }
        Ok(Self {
            server_name: config.server_name,
            secret: config.secret,
            key_providers: config.key_providers,
            token_lifetime: config.token_lifetime,
            clock: config.clock,
            random: config.random,
        })
    }

    /// Issue a challenge for the user named in the encoded `request`.
    ///
    /// The challenge embeds the fingerprint of the user's registered key so
    /// a client holding several keys can pick the right one. When no
    /// backend knows the user, a fingerprint derived from the secret and
    /// username is substituted, keeping the response shape identical for
    /// known and unknown users.
    pub fn create_challenge(&self, request: &str) -> Result<String> {
        let request = Request::deserialize(&encoding::decode(request)?)?;
        let user_name = request.user_name();

        let fingerprint = match self.lookup_key(user_name) {
            Ok(key) => Fingerprint::from_public_key(&key),
            Err(_) => {
                info!(
                    "no public key found for user {}, issuing derived fingerprint",
                    user_name
                );
                self.derived_fingerprint(user_name)
            }
        };

        let mut unique_data = [0u8; UNIQUE_DATA_LENGTH];
        self.random.fill_bytes(&mut unique_data);

        let now = self.clock.now();
        let challenge = Challenge::new(
            unique_data,
            now.saturating_sub(CLOCK_FUDGE),
            now.saturating_add(RESPONSE_TIMEOUT),
            fingerprint,
            self.server_name.as_str(),
            user_name,
        )?;
        Ok(encoding::encode(&challenge.serialize(&self.secret)))
    }

    /// Verify the encoded `response` to a previously issued challenge and
    /// exchange it for a token.
    pub fn create_token(&self, response: &str) -> Result<String> {
        let response = Response::deserialize(&encoding::decode(response)?)?;
        let challenge = Challenge::deserialize_authenticated(response.payload(), &self.secret)?;

        if challenge.server_name() != self.server_name {
            return Err(AuthError::ServerNameMismatch {
                expected: self.server_name.clone(),
                actual: challenge.server_name().to_string(),
            });
        }
        // A challenge for this user was already issued, so a missing key
        // here is a backend inconsistency, not an enumeration concern.
        let public_key = self.lookup_key(challenge.user_name())?;
        verify_signature(&public_key, response.payload(), response.signature())?;
        if challenge.is_expired(self.clock.now()) {
            return Err(AuthError::ChallengeExpired);
        }

        let now = self.clock.now();
        let token = Token::new(
            now.saturating_sub(CLOCK_FUDGE),
            now.saturating_add(self.token_lifetime),
            challenge.user_name(),
        )?;
        debug!("token issued for user {}", challenge.user_name());
        Ok(encoding::encode(&token.serialize(&self.secret)))
    }

    /// Check an encoded token's tag, expiry and claimed lifespan, returning
    /// the username it asserts.
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let token = Token::deserialize_authenticated(&encoding::decode(token)?, &self.secret)?;
        if token.is_expired(self.clock.now()) {
            return Err(AuthError::TokenExpired);
        }
        // Issued spans never exceed the lifetime ceiling plus fudge; a
        // wider window means the token was not produced by this issuance
        // path, however valid its tag looks.
        let max = MAX_TOKEN_LIFETIME + CLOCK_FUDGE;
        if token.lifespan() > max {
            return Err(AuthError::TokenLifetimeExceeded {
                lifespan: token.lifespan(),
                max,
            });
        }
        Ok(token.user_name().to_string())
    }

    fn lookup_key(&self, user_name: &str) -> Result<RsaPublicKey> {
        for provider in &self.key_providers {
            if let Ok(key) = provider.get_key(user_name) {
                return Ok(key);
            }
        }
        Err(AuthError::KeyNotFound(user_name.to_string()))
    }

    fn derived_fingerprint(&self, user_name: &str) -> Fingerprint {
        let mac = digest::authentication_code(&self.secret, user_name.as_bytes());
        let mut bytes = [0u8; FINGERPRINT_LENGTH];
        bytes.copy_from_slice(&mac[..FINGERPRINT_LENGTH]);
        Fingerprint::from(bytes)
    }
}

fn verify_signature(key: &RsaPublicKey, payload: &[u8], signature: &[u8]) -> Result<()> {
    key.verify(
        Pkcs1v15Sign::new::<Sha1>(),
        Sha1::digest(payload).as_slice(),
        signature,
    )
    .map_err(|_| AuthError::SignatureMismatch)
}
