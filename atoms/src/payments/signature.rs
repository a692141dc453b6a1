use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    MissingHeader,
    MalformedHeader,
    Mismatch,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::MissingHeader => write!(f, "signature header missing"),
            SignatureError::MalformedHeader => write!(f, "signature header is not valid hex"),
            SignatureError::Mismatch => write!(f, "signature does not match body"),
        }
    }
}

/// Verify a provider webhook signature: hex HMAC-SHA512 of the raw request
/// body under the shared secret, carried in `x-paystack-signature`.
///
/// Verification happens before the body is parsed or any store is touched.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::MissingHeader)?;
    let provided = hex::decode(header.trim()).map_err(|_| SignatureError::MalformedHeader)?;

    // HMAC accepts keys of any length, so this arm is unreachable in practice
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);

    // verify_slice is constant-time; a truncated or mutated digest fails
    mac.verify_slice(&provided)
        .map_err(|_| SignatureError::Mismatch)
}

/// Hex HMAC-SHA512 of `body` under `secret`, as the provider computes it.
///
/// Kept public for provider-side simulation: signature tests and local
/// webhook replay tooling build valid deliveries with it. Production
/// handlers only ever verify.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = match HmacSha512::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
