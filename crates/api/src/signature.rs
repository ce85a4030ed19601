//! Webhook payload signature verification.
//!
//! Each provider signs the raw request body with a shared secret and sends
//! the hex-encoded digest in a header: HMAC-SHA256 for the custody desk,
//! HMAC-SHA512 for the fiat processor. Verification runs on the raw bytes
//! before any JSON parsing, and the digest comparison is constant-time.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Header carrying the custody desk signature.
pub const CUSTODY_SIGNATURE_HEADER: &str = "x-custody-signature";

/// Header carrying the fiat processor signature.
pub const PROCESSOR_SIGNATURE_HEADER: &str = "x-processor-signature";

/// Verifies a hex-encoded HMAC-SHA256 signature over `body`.
#[must_use]
pub fn verify_sha256(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Verifies a hex-encoded HMAC-SHA512 signature over `body`.
#[must_use]
pub fn verify_sha512(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_sha256(secret: &[u8], body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    fn sign_sha512(secret: &[u8], body: &[u8]) -> String {
        let mut mac = HmacSha512::new_from_slice(secret).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_sha256_signature_is_accepted() {
        let body = br#"{"event":"transaction.incoming"}"#;
        let signature = sign_sha256(b"secret", body);

        assert!(verify_sha256(b"secret", body, &signature));
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign_sha256(b"secret", br#"{"amount":100}"#);

        assert!(!verify_sha256(b"secret", br#"{"amount":999}"#, &signature));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let body = br#"{"event":"transfer.success"}"#;
        let signature = sign_sha256(b"secret", body);

        assert!(!verify_sha256(b"other", body, &signature));
    }

    #[test]
    fn test_non_hex_signature_is_rejected() {
        assert!(!verify_sha256(b"secret", b"{}", "not hex at all"));
        assert!(!verify_sha512(b"secret", b"{}", ""));
    }

    #[test]
    fn test_sha512_signature_round_trip() {
        let body = br#"{"event":"transfer.failed"}"#;
        let signature = sign_sha512(b"secret", body);

        assert!(verify_sha512(b"secret", body, &signature));
        // The two schemes must never accept each other's digests.
        assert!(!verify_sha256(b"secret", body, &signature));
    }
}
