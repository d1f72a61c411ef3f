//! HMAC-SHA256 webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::ScmError;
use crate::service::{SecretRequest, SecretResolver};

type HmacSha256 = Hmac<Sha256>;

/// Returns the hex-encoded HMAC-SHA256 of `payload` under `secret`.
#[must_use]
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    mac(secret, payload).map_or_else(String::new, |mac| hex::encode(mac.finalize().into_bytes()))
}

/// Checks a hex-encoded HMAC-SHA256 signature in constant time.
#[must_use]
pub fn verify(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    mac(secret, payload).is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

/// Runs the signature step of a parse.
///
/// Verification happens only when `resolver` yields a non-empty secret for
/// `request`. The signature is read from `header_name`; `prefix` (e.g.
/// `sha256=`) must be present when given.
///
/// # Errors
///
/// Returns [`ScmError::SignatureMismatch`] if a secret was resolved and the
/// header is missing, malformed or wrong.
pub fn check(
    resolver: Option<&dyn SecretResolver>,
    request: &SecretRequest<'_>,
    payload: &[u8],
    header_name: &str,
    prefix: Option<&str>,
) -> Result<(), ScmError> {
    let Some(secret) = resolver
        .and_then(|r| r.secret(request))
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let signature = super::header(request.headers, header_name).and_then(|value| match prefix {
        Some(prefix) => value.strip_prefix(prefix),
        None => Some(value),
    });

    match signature {
        Some(signature) if verify(secret.as_bytes(), payload, signature) => Ok(()),
        _ => {
            tracing::debug!(
                driver = %request.driver,
                event = request.event,
                header = header_name,
                "Webhook signature rejected"
            );
            Err(ScmError::SignatureMismatch)
        }
    }
}

fn mac(secret: &[u8], payload: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload);
    Some(mac)
}
