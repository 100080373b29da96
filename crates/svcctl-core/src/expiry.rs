//! Bearer token expiry checks.
//!
//! Access tokens are JWTs: three dot-separated segments whose middle one is
//! base64-encoded JSON carrying an `exp` claim in Unix seconds. Anything that
//! cannot be read that way counts as expired.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::tokens::AccessToken;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// True when `token` is expired now, or cannot be decoded.
pub fn is_expired(token: &AccessToken) -> bool {
    is_expired_at(token, Utc::now())
}

/// True when `token` is expired at `now`, or cannot be decoded.
pub fn is_expired_at(token: &AccessToken, now: DateTime<Utc>) -> bool {
    match expiry_millis(token.as_str()) {
        Some(exp_ms) => now.timestamp_millis() >= exp_ms,
        None => true,
    }
}

/// When `token` expires, if it carries a readable `exp` claim.
pub fn expires_at(token: &AccessToken) -> Option<DateTime<Utc>> {
    let exp_ms = expiry_millis(token.as_str())?;
    Utc.timestamp_millis_opt(exp_ms).single()
}

fn expiry_millis(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() || payload.is_empty() {
        return None;
    }

    let bytes = URL_SAFE
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    let exp = claims.get("exp")?.as_f64()?;
    if !exp.is_finite() {
        return None;
    }
    Some((exp * 1000.0) as i64)
}
