//! Signed-cookie codec.
//!
//! Wraps a raw session id in an HMAC-SHA256 signature so the id embedded in a
//! cookie cannot be tampered with. The wire format is `s:<sid>.<sig>` where
//! `<sig>` is the unpadded base64 MAC over the raw id. Stateless; the only
//! input besides the value is the server-held secret.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Prefix marking a signed cookie value.
const SIGNED_PREFIX: &str = "s:";

/// Signs a session id for embedding in a cookie.
///
/// Produces `s:<sid>.<sig>` with `<sig>` the base64 (no padding) HMAC-SHA256
/// of the raw id under `secret`.
pub fn sign(sid: &str, secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(sid.as_bytes());
    let sig = STANDARD_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{SIGNED_PREFIX}{sid}.{sig}")
}

/// Recovers the session id from a signed cookie value.
///
/// Returns `None` for anything that does not verify: missing `s:` prefix,
/// missing signature separator, undecodable base64, or a MAC mismatch. The
/// comparison is constant-time, and every failure mode looks identical to an
/// absent cookie so a forged value yields no oracle.
pub fn unsign(value: &str, secret: &[u8]) -> Option<String> {
    let value = value.strip_prefix(SIGNED_PREFIX)?;
    let (sid, sig) = value.rsplit_once('.')?;
    if sid.is_empty() {
        return None;
    }
    let sig = STANDARD_NO_PAD.decode(sig.trim_end_matches('=')).ok()?;
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(sid.as_bytes());
    mac.verify_slice(&sig).ok()?;
    Some(sid.to_string())
}

/// Generates a fresh session id: 256 bits of randomness as 64 lowercase hex
/// characters.
pub fn generate_sid() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret";

    #[test]
    fn round_trip() {
        let sid = generate_sid();
        let signed = sign(&sid, SECRET);
        assert!(signed.starts_with("s:"));
        assert_eq!(unsign(&signed, SECRET), Some(sid));
    }

    #[test]
    fn rejects_missing_prefix() {
        let signed = sign("abc123", SECRET);
        assert_eq!(unsign(&signed[2..], SECRET), None);
    }

    #[test]
    fn rejects_tampered_id() {
        let signed = sign("abc123", SECRET);
        let forged = signed.replacen("abc123", "abc124", 1);
        assert_eq!(unsign(&forged, SECRET), None);
    }

    #[test]
    fn rejects_tampered_signature() {
        let signed = sign("abc123", SECRET);
        let (head, sig) = signed.rsplit_once('.').unwrap();
        let flipped: String = sig
            .chars()
            .map(|c| if c == 'A' { 'B' } else { 'A' })
            .collect();
        assert_eq!(unsign(&format!("{head}.{flipped}"), SECRET), None);
    }

    #[test]
    fn rejects_wrong_secret() {
        let signed = sign("abc123", SECRET);
        assert_eq!(unsign(&signed, b"other-secret"), None);
    }

    #[test]
    fn rejects_garbage() {
        for junk in ["", "s:", "s:.", "s:noseparator", "plain-cookie", "s:id.%%%"] {
            assert_eq!(unsign(junk, SECRET), None, "accepted {junk:?}");
        }
    }

    #[test]
    fn generated_ids_are_64_hex_chars_and_distinct() {
        let a = generate_sid();
        let b = generate_sid();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
