use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::{key::PrivateKey, url_builder::ensure_trailing_slash};

type HmacSha1 = Hmac<Sha1>;

/// Sentinel timestamp standing in for "expiry not requested".
pub const DEFAULT_TIMESTAMP: u64 = 9_999_999_999;

/// Expiry timestamp embedded in a signed URL.
///
/// `expire_seconds == 0` yields [`DEFAULT_TIMESTAMP`]; anything else yields
/// the current Unix time plus `expire_seconds`.
pub(crate) fn signature_timestamp(expire_seconds: u64) -> u64 {
    if expire_seconds == 0 {
        return DEFAULT_TIMESTAMP;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs();
    now.saturating_add(expire_seconds)
}

/// Hex-encoded HMAC-SHA1 signature over the canonical URL string.
///
/// An empty private key signs over an empty key; it is not rejected.
pub(crate) fn signature(
    private_key: &PrivateKey,
    url: &str,
    url_endpoint: &str,
    expiry_timestamp: u64,
) -> String {
    let message = canonical_string(url, url_endpoint, expiry_timestamp);
    hmac_sha1_hex(private_key.as_bytes(), message.as_bytes())
}

/// The HMAC message: the URL with the endpoint prefix removed and the expiry
/// timestamp appended.
///
/// Prefix stripping is anchored at the start of the URL; endpoint text that
/// reappears later in the path or query is left alone. A zero timestamp maps
/// to [`DEFAULT_TIMESTAMP`].
pub(crate) fn canonical_string(url: &str, url_endpoint: &str, expiry_timestamp: u64) -> String {
    let expiry_timestamp = if expiry_timestamp == 0 {
        DEFAULT_TIMESTAMP
    } else {
        expiry_timestamp
    };
    let url_endpoint = ensure_trailing_slash(url_endpoint);
    let stripped = url.strip_prefix(url_endpoint.as_str()).unwrap_or(url);
    format!("{stripped}{expiry_timestamp}")
}

fn hmac_sha1_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_expiry_yields_sentinel() {
        assert_eq!(signature_timestamp(0), DEFAULT_TIMESTAMP);
    }

    #[test]
    fn nonzero_expiry_is_relative_to_now() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let timestamp = signature_timestamp(300);
        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(timestamp >= before + 300);
        assert!(timestamp <= after + 300);
    }

    #[test]
    fn oversized_expiry_saturates_instead_of_overflowing() {
        assert_eq!(signature_timestamp(u64::MAX), u64::MAX);
    }

    #[test]
    fn canonical_string_strips_endpoint_prefix() {
        assert_eq!(
            canonical_string(
                "https://ik.imagekit.io/demo/default-image.jpg",
                "https://ik.imagekit.io/demo/",
                DEFAULT_TIMESTAMP,
            ),
            "default-image.jpg9999999999"
        );
    }

    #[test]
    fn canonical_string_normalizes_endpoint_slash() {
        assert_eq!(
            canonical_string(
                "https://ik.imagekit.io/demo/default-image.jpg",
                "https://ik.imagekit.io/demo",
                DEFAULT_TIMESTAMP,
            ),
            "default-image.jpg9999999999"
        );
    }

    #[test]
    fn canonical_string_substitutes_sentinel_for_zero() {
        assert_eq!(
            canonical_string("https://e/x.jpg", "https://e/", 0),
            "x.jpg9999999999"
        );
    }

    #[test]
    fn prefix_stripping_is_anchored() {
        // Endpoint text inside the path must not be removed.
        let url = "https://cdn.example.com/a/https://ik.imagekit.io/demo/x.jpg";
        assert_eq!(
            canonical_string(url, "https://ik.imagekit.io/demo/", 1_700_000_000),
            format!("{url}1700000000")
        );
    }

    #[test]
    fn hmac_sha1_matches_known_vector() {
        assert_eq!(
            hmac_sha1_hex(b"key", b"The quick brown fox jumps over the lazy dog"),
            "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9"
        );
    }

    #[test]
    fn empty_key_still_signs() {
        let sig = signature(
            &PrivateKey::default(),
            "https://e/x.jpg",
            "https://e/",
            DEFAULT_TIMESTAMP,
        );
        assert_eq!(sig.len(), 40);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
