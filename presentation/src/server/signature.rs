//! Slack request signature verification
//!
//! Slack signs every request with HMAC-SHA256 over `v0:{timestamp}:{body}`
//! and sends the hex digest as `X-Slack-Signature: v0=<hex>`.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Oldest request timestamp accepted, in seconds
pub const MAX_REQUEST_AGE_SECS: i64 = 60 * 5;

/// Reasons a request is not accepted as coming from Slack
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing {0} header")]
    MissingHeader(&'static str),

    #[error("Malformed {0} header")]
    Malformed(&'static str),

    #[error("Request timestamp outside the accepted window")]
    Stale,

    #[error("Signature mismatch")]
    Mismatch,

    #[error("Invalid signing secret")]
    InvalidSecret,
}

/// Compute the `v0=<hex>` signature of a request
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = hmac_for(secret, timestamp)?;
    mac.update(body);
    Ok(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

fn hmac_for(secret: &str, timestamp: i64) -> Result<Hmac<Sha256>, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(format!("v0:{}:", timestamp).as_bytes());
    Ok(mac)
}

/// Verify the signature headers of a request against `body`.
///
/// `now` is the current Unix time in seconds.
pub fn verify(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?
        .to_str()
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or(SignatureError::Malformed(TIMESTAMP_HEADER))?;

    if (now - timestamp).abs() > MAX_REQUEST_AGE_SECS {
        return Err(SignatureError::Stale);
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?
        .to_str()
        .map_err(|_| SignatureError::Malformed(SIGNATURE_HEADER))?;
    let digest = signature
        .strip_prefix("v0=")
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
        .ok_or(SignatureError::Malformed(SIGNATURE_HEADER))?;

    let mut mac = hmac_for(secret, timestamp)?;
    mac.update(body);
    mac.verify_slice(&digest).map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;

    fn headers(timestamp: i64, signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_str(&timestamp.to_string()).unwrap());
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(signature).unwrap());
        headers
    }

    #[test]
    fn test_slack_documentation_vector() {
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let signature = "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";

        assert_eq!(sign(SECRET, NOW, body).unwrap(), signature);
        assert_eq!(verify(&headers(NOW, signature), body, SECRET, NOW), Ok(()));
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign(SECRET, NOW, b"payload=a").unwrap();
        assert_eq!(
            verify(&headers(NOW, &signature), b"payload=b", SECRET, NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let signature = sign(SECRET, NOW, b"x").unwrap();
        assert_eq!(
            verify(&headers(NOW, &signature), b"x", SECRET, NOW + MAX_REQUEST_AGE_SECS + 1),
            Err(SignatureError::Stale)
        );
        assert!(
            verify(&headers(NOW, &signature), b"x", SECRET, NOW + MAX_REQUEST_AGE_SECS).is_ok()
        );
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        assert_eq!(
            verify(&HeaderMap::new(), b"x", SECRET, NOW),
            Err(SignatureError::MissingHeader(TIMESTAMP_HEADER))
        );
        assert_eq!(
            verify(&headers(NOW, "sha256=abc"), b"x", SECRET, NOW),
            Err(SignatureError::Malformed(SIGNATURE_HEADER))
        );
    }
}
