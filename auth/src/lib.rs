pub mod client;
pub mod error;
pub mod key_provider;
pub mod random;
pub mod server;
pub mod signer;
pub mod time;

pub use client::AuthClient;
pub use error::{AuthError, Result};
pub use key_provider::{InMemoryKeyProvider, KeyProvider};
pub use random::{OsRandom, RandomSource};
pub use server::{AuthServer, CLOCK_FUDGE, MAX_TOKEN_LIFETIME, RESPONSE_TIMEOUT, ServerConfig};
pub use signer::{Signer, SingleKeySigner};
pub use time::{Clock, SystemClock};
