use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of the authentication tag carried by Challenge and
/// Token messages.
pub const MAC_LENGTH: usize = 32;

/// Keyed authentication code over `data`, HMAC-SHA256 per RFC 2104.
pub fn authentication_code(secret: &[u8], data: &[u8]) -> [u8; MAC_LENGTH] {
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Constant-time check of `tag` against the authentication code of `data`.
///
/// The tag is compared against a fixed-length padded copy, and the length
/// check is folded into the same combination, so a wrong-length tag costs
/// the same comparison work as a wrong-byte tag.
pub fn verify_authentication_code(secret: &[u8], data: &[u8], tag: &[u8]) -> bool {
    let expected = authentication_code(secret, data);
    let mut padded = [0u8; MAC_LENGTH];
    for (dst, src) in padded.iter_mut().zip(tag) {
        *dst = *src;
    }
    let length_ok = Choice::from(u8::from(tag.len() == MAC_LENGTH));
    bool::from(expected.as_slice().ct_eq(padded.as_slice()) & length_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_deterministic_and_full_length() {
        let a = authentication_code(b"secret", b"payload");
        let b = authentication_code(b"secret", b"payload");
        assert_eq!(a, b);
        assert_eq!(a.len(), MAC_LENGTH);
    }

    #[test]
    fn code_depends_on_secret_and_data() {
        let reference = authentication_code(b"secret", b"payload");
        assert_ne!(reference, authentication_code(b"other", b"payload"));
        assert_ne!(reference, authentication_code(b"secret", b"payloae"));
    }

    #[test]
    fn verify_accepts_matching_tag() {
        let tag = authentication_code(b"secret", b"payload");
        assert!(verify_authentication_code(b"secret", b"payload", &tag));
    }

    #[test]
    fn verify_rejects_any_flipped_bit() {
        let tag = authentication_code(b"secret", b"payload");
        for i in 0..tag.len() {
            let mut tampered = tag;
            tampered[i] ^= 0x01;
            assert!(!verify_authentication_code(b"secret", b"payload", &tampered));
        }
    }

    #[test]
    fn verify_rejects_wrong_length_tags() {
        let tag = authentication_code(b"secret", b"payload");
        assert!(!verify_authentication_code(b"secret", b"payload", &tag[..31]));
        assert!(!verify_authentication_code(b"secret", b"payload", &[]));
        let mut long = tag.to_vec();
        long.push(0);
        assert!(!verify_authentication_code(b"secret", b"payload", &long));
    }
}
