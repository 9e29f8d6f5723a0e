//! Field transform engine
//!
//! [`EncryptFilter`] is the per-field dispatcher: given a value reference
//! and its tag descriptor it validates preconditions, selects the
//! protection operation, and rewrites the field in place. It holds no
//! mutable state, so one filter (or clones of it) is shared across all
//! concurrent event-processing paths; safety reduces to the wrapper
//! capability being safe for concurrent use.
//!
//! The dispatch is fail-closed throughout: a missing tag is a hard error,
//! an unknown classification is redacted, and a classified field without a
//! concrete operation is refused rather than emitted as-is.

use crate::classification::{Classification, FieldTag, Operation};
use crate::error::{Error, Result};
use crate::field::FieldRef;
use crate::wrapper::{encode_envelope, Wrapper};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::SigningKey;
use ring::hmac;
use std::sync::Arc;
use tracing::trace;

/// Fixed marker written in place of redacted values. Distinct from any
/// `encrypted:v1:` or `hmac-sh256:` encoding.
pub const REDACTED_DATA: &str = "<REDACTED>";

/// Scheme prefix of encoded HMAC-SHA256 digests.
pub const HMAC_SHA256_PREFIX: &str = "hmac-sh256:";

/// Call-scoped overrides for a single filter invocation.
///
/// Overrides compose last-wins and never mutate the shared filter
/// configuration; they live on the caller's stack for one call.
#[derive(Clone, Default)]
pub struct FilterOptions {
    wrapper: Option<Arc<dyn Wrapper>>,
    salt: Option<Vec<u8>>,
    info: Option<Vec<u8>>,
}

impl FilterOptions {
    /// No overrides; the filter's own configuration applies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the wrapper for this call.
    pub fn with_wrapper(mut self, wrapper: Arc<dyn Wrapper>) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    /// Override the HMAC salt for this call.
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Override the HMAC info for this call.
    pub fn with_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Classification-driven field protection filter.
///
/// Configuration is fixed at construction and shared read-only across all
/// concurrent field transforms. A filter without a wrapper is valid to
/// construct; `Encrypt` and `HmacSha256` fields then fail with
/// "missing wrapper" unless a call-scoped override supplies one.
#[derive(Clone, Default)]
pub struct EncryptFilter {
    wrapper: Option<Arc<dyn Wrapper>>,
    hmac_salt: Vec<u8>,
    hmac_info: Vec<u8>,
}

impl EncryptFilter {
    /// Create a filter around a wrapper, with empty default salt/info.
    pub fn new(wrapper: Arc<dyn Wrapper>) -> Self {
        Self {
            wrapper: Some(wrapper),
            ..Self::default()
        }
    }

    /// Start building a filter.
    pub fn builder() -> EncryptFilterBuilder {
        EncryptFilterBuilder::new()
    }

    /// Transform one field in place according to its tag descriptor.
    ///
    /// See the module docs for the dispatch rules. On any failure the
    /// field keeps its prior content; the original sensitive value is
    /// never emitted through an error path.
    pub async fn filter_value(
        &self,
        field: &mut FieldRef<'_>,
        tag: Option<&FieldTag>,
        opts: &FilterOptions,
    ) -> Result<()> {
        let tag = tag.ok_or_else(|| {
            Error::InvalidParameter("missing classification tag".to_string())
        })?;

        // Nothing present, nothing to protect.
        if field.is_absent() {
            return Ok(());
        }

        trace!(
            classification = %tag.classification,
            operation = %tag.operation,
            "filtering field"
        );

        match tag.classification {
            Classification::Public => Ok(()),
            Classification::Sensitive | Classification::Secret => match tag.operation {
                Operation::Encrypt => {
                    self.require_wrapper(opts)?;
                    self.require_supported(field)?;
                    match field.bytes().map(<[u8]>::to_vec) {
                        // Zero-length but present: encrypting nothing
                        // yields nothing, and no envelope is fabricated.
                        Some(data) if data.is_empty() => Ok(()),
                        Some(data) => {
                            let encoded = self.encrypt(Some(data.as_slice()), opts).await?;
                            field.set(&encoded)
                        }
                        None => Ok(()),
                    }
                }
                Operation::HmacSha256 => {
                    self.require_wrapper(opts)?;
                    self.require_supported(field)?;
                    match field.bytes().map(<[u8]>::to_vec) {
                        Some(data) if data.is_empty() => Ok(()),
                        Some(data) => {
                            let encoded = self.hmac_sha256(Some(data.as_slice()), opts).await?;
                            field.set(&encoded)
                        }
                        None => Ok(()),
                    }
                }
                Operation::Redact => field.set(REDACTED_DATA),
                // A classified field with no concrete protection
                // instruction must never be emitted as-is.
                Operation::NoOperation => Err(Error::InvalidParameter(
                    "unknown filter operation".to_string(),
                )),
            },
            // Safety net for misconfigured or future classification
            // values: redact regardless of the declared operation.
            Classification::Unknown => field.set(REDACTED_DATA),
        }
    }

    /// Encrypt `data` through the effective wrapper and render the
    /// envelope as text.
    ///
    /// `None` is the argument-level "missing data" case and fails;
    /// `Some` of an empty slice is a handled edge case yielding an empty
    /// string without touching the wrapper. Output is non-deterministic
    /// across calls: recovery, not correlation, is the goal here.
    pub async fn encrypt(&self, data: Option<&[u8]>, opts: &FilterOptions) -> Result<String> {
        let data =
            data.ok_or_else(|| Error::InvalidParameter("missing data".to_string()))?;
        let wrapper = self.effective_wrapper(opts)?;
        if data.is_empty() {
            return Ok(String::new());
        }

        let envelope = wrapper.encrypt(data).await?;
        Ok(encode_envelope(&envelope))
    }

    /// Compute the deterministic keyed pseudonym of `data`:
    /// `"hmac-sh256:" + base64url-no-pad(HMAC-SHA256(derived key, data))`.
    ///
    /// Identical `(data, wrapper, salt, info)` always produce an identical
    /// string, so equal pseudonyms across events mean equal inputs.
    pub async fn hmac_sha256(&self, data: Option<&[u8]>, opts: &FilterOptions) -> Result<String> {
        let data =
            data.ok_or_else(|| Error::InvalidParameter("missing data".to_string()))?;
        let wrapper = self.effective_wrapper(opts)?;
        if data.is_empty() {
            return Ok(String::new());
        }

        let salt = opts.salt.as_deref().unwrap_or(&self.hmac_salt);
        let info = opts.info.as_deref().unwrap_or(&self.hmac_info);
        let key = derive_hmac_key(wrapper.as_ref(), salt, info).await?;

        let key = hmac::Key::new(hmac::HMAC_SHA256, &key);
        let digest = hmac::sign(&key, data);
        Ok(format!(
            "{}{}",
            HMAC_SHA256_PREFIX,
            URL_SAFE_NO_PAD.encode(digest.as_ref())
        ))
    }

    fn effective_wrapper(&self, opts: &FilterOptions) -> Result<Arc<dyn Wrapper>> {
        opts.wrapper
            .as_ref()
            .or(self.wrapper.as_ref())
            .cloned()
            .ok_or_else(|| Error::InvalidParameter("missing wrapper".to_string()))
    }

    fn require_wrapper(&self, opts: &FilterOptions) -> Result<()> {
        self.effective_wrapper(opts).map(|_| ())
    }

    fn require_supported(&self, field: &FieldRef<'_>) -> Result<()> {
        if field.is_supported() {
            Ok(())
        } else {
            Err(Error::InvalidParameter(
                "field value is not a string or binary".to_string(),
            ))
        }
    }
}

/// Derive the 32-byte HMAC key for `(wrapper root key, salt, info)`.
///
/// The wrapper's deterministic derivation produces a 32-byte seed, the
/// seed feeds the Ed25519 seed-to-keypair generator, and the keypair's
/// 32-byte public component becomes the HMAC key. The indirection through
/// the keypair generator is pinned: historical pseudonyms were produced
/// this way, and changing it would break equality-based correlation with
/// already-stored values.
pub async fn derive_hmac_key(
    wrapper: &dyn Wrapper,
    salt: &[u8],
    info: &[u8],
) -> Result<[u8; 32]> {
    let seed = wrapper.derive(32, salt, info).await?;
    let seed: [u8; 32] = seed
        .try_into()
        .map_err(|_| Error::Crypto("derived seed is not 32 bytes".to_string()))?;
    let signing_key = SigningKey::from_bytes(&seed);
    Ok(signing_key.verifying_key().to_bytes())
}

/// Builder for [`EncryptFilter`].
pub struct EncryptFilterBuilder {
    wrapper: Option<Arc<dyn Wrapper>>,
    hmac_salt: Vec<u8>,
    hmac_info: Vec<u8>,
}

impl EncryptFilterBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            wrapper: None,
            hmac_salt: Vec::new(),
            hmac_info: Vec::new(),
        }
    }

    /// Set the wrapper capability.
    pub fn wrapper(mut self, wrapper: Arc<dyn Wrapper>) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    /// Set the default HMAC salt.
    pub fn hmac_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.hmac_salt = salt.into();
        self
    }

    /// Set the default HMAC info.
    pub fn hmac_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.hmac_info = info.into();
        self
    }

    /// Build the filter.
    pub fn build(self) -> EncryptFilter {
        EncryptFilter {
            wrapper: self.wrapper,
            hmac_salt: self.hmac_salt,
            hmac_info: self.hmac_info,
        }
    }
}

impl Default for EncryptFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
