//! Wrapper capability boundary
//!
//! The wrapper is the external key-management backend: it owns the root key
//! material and exposes reversible envelope encryption plus a deterministic
//! keyed derivation bound to that root key. The filter never sees a key;
//! it only sees this trait. [`AeadWrapper`] is the in-process reference
//! implementation (and the wrapper the tests use).

mod aead;

pub use aead::AeadWrapper;

use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Version prefix of the envelope text encoding.
const ENVELOPE_PREFIX: &str = "encrypted:v1:";

/// Envelope-encryption and key-derivation capability.
///
/// Implementations must be safe for concurrent use: the filter shares one
/// wrapper handle across many parallel field transforms and assumes calls
/// do not mutate observable key state. Cancellation is the caller dropping
/// the future; the filter adds no timeouts or retries of its own.
#[async_trait]
pub trait Wrapper: Send + Sync {
    /// Encrypt `plaintext` into a self-contained envelope: ciphertext plus
    /// whatever nonce/key metadata the scheme needs to decrypt later.
    /// May produce different output for identical input.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt an envelope produced by [`Wrapper::encrypt`] on the same
    /// root key. Must fail for envelopes from an unrelated wrapper.
    async fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>>;

    /// Derive `len` pseudorandom bytes deterministically bound to
    /// `(root key, salt, info)`. Same inputs, same output; different salt
    /// or info, unrelated output.
    async fn derive(&self, len: usize, salt: &[u8], info: &[u8]) -> Result<Vec<u8>>;
}

/// Render an envelope into its stable text encoding, suitable for
/// embedding as a field value.
pub fn encode_envelope(envelope: &[u8]) -> String {
    format!("{}{}", ENVELOPE_PREFIX, URL_SAFE_NO_PAD.encode(envelope))
}

/// Parse the text encoding back into envelope bytes.
pub fn decode_envelope(encoded: &str) -> Result<Vec<u8>> {
    let b64 = encoded.strip_prefix(ENVELOPE_PREFIX).ok_or_else(|| {
        Error::InvalidParameter("not a versioned envelope encoding".to_string())
    })?;
    URL_SAFE_NO_PAD
        .decode(b64)
        .map_err(|e| Error::InvalidParameter(format!("malformed envelope encoding: {}", e)))
}

/// Decrypt an encoded field value back to the original bytes.
///
/// Used by downstream consumers of protected audit data, not by the filter
/// itself.
pub async fn decrypt_value(wrapper: &dyn Wrapper, encoded: &str) -> Result<Vec<u8>> {
    let envelope = decode_envelope(encoded)?;
    wrapper.decrypt(&envelope).await
}
