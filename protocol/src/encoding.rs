use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::error::Result;

/// Encode message bytes for embedding in headers or URLs.
pub fn encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode a transport string back to message bytes.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    #[test]
    fn round_trip() {
        let data = b"\x00\x01binary \xff data";
        assert_eq!(decode(&encode(data)).unwrap(), data);
    }

    #[test]
    fn alphabet_is_url_safe_without_padding() {
        let encoded = encode(&[0xfb, 0xff, 0xfe]);
        assert_eq!(encoded, "-__-");
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            decode("not base64!"),
            Err(ProtocolError::Encoding(_))
        ));
    }
}
