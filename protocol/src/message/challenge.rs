use super::{ensure_non_empty, ensure_window, outside_window, pack_header, unpack_header};
use crate::codec::{Packer, Unpacker};
use crate::digest;
use crate::error::{ProtocolError, Result};
use crate::fingerprint::Fingerprint;

/// Length in bytes of the nonce carried by every challenge.
pub const UNIQUE_DATA_LENGTH: usize = 20;

const MAGIC: u8 = b'c';

/// Server-issued proof request binding a nonce, a validity window, the
/// fingerprint of the expected signing key and both peer identities.
///
/// Travels with an authentication tag over its serialized bytes, so the
/// stateless server can trust a challenge when it comes back embedded in
/// a [`Response`](crate::message::Response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    unique_data: [u8; UNIQUE_DATA_LENGTH],
    valid_from: u32,
    valid_to: u32,
    fingerprint: Fingerprint,
    server_name: String,
    user_name: String,
}

impl Challenge {
    pub fn new(
        unique_data: [u8; UNIQUE_DATA_LENGTH],
        valid_from: u32,
        valid_to: u32,
        fingerprint: Fingerprint,
        server_name: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Result<Self> {
        let server_name = server_name.into();
        let user_name = user_name.into();
        ensure_window(valid_from, valid_to)?;
        ensure_non_empty("server_name", &server_name)?;
        ensure_non_empty("user_name", &user_name)?;
        Ok(Self {
            unique_data,
            valid_from,
            valid_to,
            fingerprint,
            server_name,
            user_name,
        })
    }

    pub fn unique_data(&self) -> &[u8] {
        &self.unique_data
    }

    pub fn valid_from(&self) -> u32 {
        self.valid_from
    }

    pub fn valid_to(&self) -> u32 {
        self.valid_to
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn is_expired(&self, now: u32) -> bool {
        outside_window(self.valid_from, self.valid_to, now)
    }

    /// Serialized challenge with an authentication tag appended over the
    /// body bytes.
    pub fn serialize(&self, secret: &[u8]) -> Vec<u8> {
        let mut packer = Packer::new();
        pack_header(&mut packer, MAGIC);
        packer.pack_bin(&self.unique_data);
        packer.pack_uint(self.valid_from);
        packer.pack_uint(self.valid_to);
        packer.pack_bin(self.fingerprint.as_bytes());
        packer.pack_str(&self.server_name);
        packer.pack_str(&self.user_name);
        let mac = digest::authentication_code(secret, packer.packed());
        packer.pack_bin(&mac);
        packer.into_bytes()
    }

    /// Decode without verifying the trailing tag. The client side cannot
    /// verify it (the tag keys on the server secret) and does not need to.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        Self::unpack_body(&mut Unpacker::new(data))
    }

    /// Decode and verify the trailing tag against `secret` in constant
    /// time.
    pub fn deserialize_authenticated(data: &[u8], secret: &[u8]) -> Result<Self> {
        let mut unpacker = Unpacker::new(data);
        let challenge = Self::unpack_body(&mut unpacker)?;
        let body_len = unpacker.bytes_read();
        let tag = unpacker.unpack_bin()?;
        if !digest::verify_authentication_code(secret, &data[..body_len], &tag) {
            return Err(ProtocolError::MacMismatch);
        }
        Ok(challenge)
    }

    fn unpack_body(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        unpack_header(unpacker, MAGIC)?;
        let unique_data: [u8; UNIQUE_DATA_LENGTH] =
            unpacker.unpack_bin()?.try_into().map_err(|data: Vec<u8>| {
                ProtocolError::Malformed(format!(
                    "challenge nonce must be {UNIQUE_DATA_LENGTH} bytes, got {}",
                    data.len()
                ))
            })?;
        let valid_from = unpacker.unpack_uint()?;
        let valid_to = unpacker.unpack_uint()?;
        let fingerprint = Fingerprint::from_bytes(&unpacker.unpack_bin()?)?;
        let server_name = unpacker.unpack_str()?;
        let user_name = unpacker.unpack_str()?;
        Self::new(
            unique_data,
            valid_from,
            valid_to,
            fingerprint,
            server_name,
            user_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding;

    const SECRET: &[u8] = b"secret";

    // Encoded form produced by already-deployed implementations.
    const KNOWN_ENCODED: &str = concat!(
        "AWPEFHVYRk_S23_-fX-TkSB2aIlHNh_CzlFdiK7OUV2J2sQGTJoHEssesnNlcnZl",
        "ci5leGFtcGxlLmNvbah1c2VybmFtZcQg9y3oyBv4xUfpPHC9ZcHoj-c1hjHtOj9T",
        "Sn_jVvv8ELI",
    );

    fn known_challenge() -> Challenge {
        let unique_data: [u8; UNIQUE_DATA_LENGTH] = encoding::decode("dVhGT9Lbf_59f5ORIHZoiUc2H8I")
            .unwrap()
            .try_into()
            .unwrap();
        let fingerprint =
            Fingerprint::from_bytes(&encoding::decode("TJoHEsse").unwrap()).unwrap();
        Challenge::new(
            unique_data,
            1365084334,
            1365084634,
            fingerprint,
            "server.example.com",
            "username",
        )
        .unwrap()
    }

    #[test]
    fn matches_known_encoding() {
        let encoded = encoding::encode(&known_challenge().serialize(SECRET));
        assert_eq!(encoded, KNOWN_ENCODED);
    }

    #[test]
    fn known_encoding_deserializes_authenticated() {
        let data = encoding::decode(KNOWN_ENCODED).unwrap();
        let challenge = Challenge::deserialize_authenticated(&data, SECRET).unwrap();
        assert_eq!(challenge, known_challenge());
    }

    #[test]
    fn round_trip_authenticated() {
        let challenge = Challenge::new(
            [7; UNIQUE_DATA_LENGTH],
            100,
            200,
            Fingerprint::from([1, 2, 3, 4, 5, 6]),
            "srv",
            "user",
        )
        .unwrap();
        let data = challenge.serialize(b"key");
        assert_eq!(
            Challenge::deserialize_authenticated(&data, b"key").unwrap(),
            challenge
        );
        assert_eq!(Challenge::deserialize(&data).unwrap(), challenge);
    }

    #[test]
    fn tampered_tag_fails_authentication_but_still_parses() {
        let data = encoding::decode(KNOWN_ENCODED).unwrap();
        let mut tampered = data.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        assert!(Challenge::deserialize(&tampered).is_ok());
        assert!(matches!(
            Challenge::deserialize_authenticated(&tampered, SECRET),
            Err(ProtocolError::MacMismatch)
        ));
    }

    #[test]
    fn tampered_body_fails_authentication() {
        let mut data = encoding::decode(KNOWN_ENCODED).unwrap();
        // inside the nonce field
        data[4] ^= 0x01;
        assert!(matches!(
            Challenge::deserialize_authenticated(&data, SECRET),
            Err(ProtocolError::MacMismatch)
        ));
    }

    #[test]
    fn wrong_secret_fails_authentication() {
        let data = encoding::decode(KNOWN_ENCODED).unwrap();
        assert!(matches!(
            Challenge::deserialize_authenticated(&data, b"another_secret"),
            Err(ProtocolError::MacMismatch)
        ));
    }

    #[test]
    fn obsolete_version_bytes_are_reported_as_such() {
        let mut data = encoding::decode(KNOWN_ENCODED).unwrap();
        for byte in [b'v', b'r'] {
            data[0] = byte;
            assert!(matches!(
                Challenge::deserialize(&data),
                Err(ProtocolError::ObsoleteVersion(b)) if b == byte
            ));
        }
    }

    #[test]
    fn unknown_version_byte_is_reported_as_such() {
        let mut data = encoding::decode(KNOWN_ENCODED).unwrap();
        data[0] = 0x02;
        assert!(matches!(
            Challenge::deserialize(&data),
            Err(ProtocolError::UnsupportedVersion(0x02))
        ));
    }

    #[test]
    fn foreign_magic_is_malformed() {
        let mut data = encoding::decode(KNOWN_ENCODED).unwrap();
        data[1] = b't';
        assert!(matches!(
            Challenge::deserialize(&data),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn constructor_enforces_invariants() {
        let fingerprint = Fingerprint::from([0; 6]);
        assert!(Challenge::new([0; 20], 200, 100, fingerprint, "srv", "user").is_err());
        assert!(Challenge::new([0; 20], 100, 100, fingerprint, "srv", "user").is_err());
        assert!(Challenge::new([0; 20], 100, 200, fingerprint, "", "user").is_err());
        assert!(Challenge::new([0; 20], 100, 200, fingerprint, "srv", "").is_err());
    }

    #[test]
    fn expiry_window_is_closed() {
        let challenge = Challenge::new(
            [0; UNIQUE_DATA_LENGTH],
            100,
            200,
            Fingerprint::from([0; 6]),
            "srv",
            "user",
        )
        .unwrap();
        assert!(challenge.is_expired(99));
        assert!(!challenge.is_expired(100));
        assert!(!challenge.is_expired(150));
        assert!(!challenge.is_expired(200));
        assert!(challenge.is_expired(201));
    }
}
