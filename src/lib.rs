//! Fieldveil - classification-driven field protection for audit pipelines
//!
//! Fieldveil sits at the trust boundary of an audit/observability
//! pipeline: before an event is serialized and shipped, every structured
//! field annotated with a sensitivity classification is transformed in
//! place so that sensitive data never reaches a sink in recoverable or
//! identifiable plaintext unless explicitly authorized.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Event pipeline (external)                   │
//! │  struct walker: discovers fields, reads classification tags  │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ one call per leaf field
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │                        EncryptFilter                         │
//! │  - validate tag + value shape (fail closed)                  │
//! │  - dispatch on (Classification, Operation)                   │
//! │  - write result back through the FieldRef accessor           │
//! └──────┬──────────────────┬───────────────────────┬────────────┘
//!        │ encrypt          │ hmac_sha256           │ redact
//! ┌──────▼──────────────────▼──────┐   ┌────────────▼────────────┐
//! │       Wrapper capability       │   │   "<REDACTED>" marker   │
//! │  envelope encryption + keyed   │   │   (no key material)     │
//! │  deterministic derivation      │   └─────────────────────────┘
//! └────────────────────────────────┘
//! ```
//!
//! ## Protection operations
//!
//! - **Encrypt**: reversible envelope encryption through the wrapper,
//!   rendered as `encrypted:v1:<base64url>`. Non-deterministic; meant for
//!   recovery by authorized downstream consumers.
//! - **HmacSha256**: deterministic keyed pseudonymization, rendered as
//!   `hmac-sh256:<base64url>`. Equal inputs yield equal pseudonyms, so
//!   values correlate across events without being recoverable.
//! - **Redact**: the fixed `<REDACTED>` marker.
//!
//! Unknown classifications redact, classified fields without a concrete
//! operation are refused, and untagged fields are hard errors: every
//! ambiguity resolves to the most restrictive behavior.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fieldveil::{
//!     AeadWrapper, Classification, EncryptFilter, FieldRef, FieldTag,
//!     FilterOptions, Operation,
//! };
//!
//! # async fn example() -> fieldveil::Result<()> {
//! let filter = EncryptFilter::builder()
//!     .wrapper(Arc::new(AeadWrapper::generate()))
//!     .hmac_salt(b"salt".to_vec())
//!     .hmac_info(b"info".to_vec())
//!     .build();
//!
//! let mut email = "alice@example.com".to_string();
//! let tag = FieldTag::new(Classification::Sensitive, Operation::HmacSha256);
//! filter
//!     .filter_value(&mut FieldRef::Text(&mut email), Some(&tag), &FilterOptions::new())
//!     .await?;
//! // email is now "hmac-sh256:..."
//! # Ok(())
//! # }
//! ```

pub mod classification;
pub mod error;
pub mod field;
pub mod filter;
pub mod wrapper;

pub use classification::{Classification, FieldTag, Operation};
pub use error::{Error, Result};
pub use field::FieldRef;
pub use filter::{
    derive_hmac_key, EncryptFilter, EncryptFilterBuilder, FilterOptions, HMAC_SHA256_PREFIX,
    REDACTED_DATA,
};
pub use wrapper::{decode_envelope, decrypt_value, encode_envelope, AeadWrapper, Wrapper};
