//! Classification policy: sensitivity levels, protection operations, and
//! the per-field tag descriptor
//!
//! These are pure data. The dispatch rules that interpret them live in
//! [`crate::filter`]. The one policy decision encoded here is fail-closed
//! parsing: an unrecognized classification string becomes
//! [`Classification::Unknown`] (which the engine redacts) and an
//! unrecognized operation string becomes [`Operation::NoOperation`] (which
//! the engine rejects for classified fields). A typo in an annotation must
//! never widen into passthrough.

use serde::{Deserialize, Serialize};

/// Declared sensitivity level of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// No classification could be determined. Treated as the most
    /// restrictive policy: the field is redacted.
    Unknown,
    /// Safe to emit unchanged.
    Public,
    /// Requires protection before emission.
    Sensitive,
    /// Requires protection before emission.
    Secret,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Public => write!(f, "public"),
            Self::Sensitive => write!(f, "sensitive"),
            Self::Secret => write!(f, "secret"),
        }
    }
}

impl std::str::FromStr for Classification {
    type Err = std::convert::Infallible;

    /// Parsing never fails: anything outside the known set is `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "public" => Self::Public,
            "sensitive" => Self::Sensitive,
            "secret" => Self::Secret,
            _ => Self::Unknown,
        })
    }
}

/// Declared protection operation for a classified field
///
/// Only meaningful when the classification is `Sensitive` or `Secret`;
/// ignored for `Public`, and overridden by forced redaction for `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// No concrete instruction. Invalid for classified fields.
    NoOperation,
    /// Reversible envelope encryption via the wrapper.
    Encrypt,
    /// Deterministic keyed pseudonymization.
    HmacSha256,
    /// Replace with the fixed redaction marker.
    Redact,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOperation => write!(f, "no_operation"),
            Self::Encrypt => write!(f, "encrypt"),
            Self::HmacSha256 => write!(f, "hmac_sha256"),
            Self::Redact => write!(f, "redact"),
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = std::convert::Infallible;

    /// Parsing never fails: anything outside the known set is
    /// `NoOperation`, which the engine refuses to emit for classified
    /// fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "encrypt" => Self::Encrypt,
            "hmac_sha256" => Self::HmacSha256,
            "redact" => Self::Redact,
            _ => Self::NoOperation,
        })
    }
}

/// Tag descriptor attached to one field for one filter invocation
///
/// Constructed by the external walker from the field's annotation,
/// immutable, and discarded after the call. A field that carries no tag at
/// all is a hard error in [`crate::filter::EncryptFilter::filter_value`],
/// never an implicit `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTag {
    /// Declared sensitivity level.
    pub classification: Classification,
    /// Declared protection operation.
    pub operation: Operation,
}

impl FieldTag {
    /// Create a tag descriptor.
    pub fn new(classification: Classification, operation: Operation) -> Self {
        Self {
            classification,
            operation,
        }
    }

    /// Shorthand for a public (passthrough) tag.
    pub fn public() -> Self {
        Self::new(Classification::Public, Operation::NoOperation)
    }
}

impl std::str::FromStr for FieldTag {
    type Err = std::convert::Infallible;

    /// Parse the compact annotation form `"<classification>[,<operation>]"`,
    /// e.g. `"secret,encrypt"`, `"sensitive,hmac_sha256"`, or `"public"`.
    /// A missing operation part parses as `NoOperation`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let classification = parts.next().unwrap_or("").trim().parse()?;
        let operation = match parts.next() {
            Some(op) => op.trim().parse()?,
            None => Operation::NoOperation,
        };
        Ok(Self {
            classification,
            operation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_roundtrip() {
        for c in [
            Classification::Public,
            Classification::Sensitive,
            Classification::Secret,
            Classification::Unknown,
        ] {
            let parsed: Classification = c.to_string().parse().unwrap();
            assert_eq!(parsed, c);
        }
    }

    #[test]
    fn test_unrecognized_classification_fails_closed() {
        let parsed: Classification = "top-secret".parse().unwrap();
        assert_eq!(parsed, Classification::Unknown);

        let parsed: Classification = "".parse().unwrap();
        assert_eq!(parsed, Classification::Unknown);
    }

    #[test]
    fn test_unrecognized_operation_fails_closed() {
        let parsed: Operation = "rot13".parse().unwrap();
        assert_eq!(parsed, Operation::NoOperation);
    }

    #[test]
    fn test_tag_annotation_parsing() {
        let tag: FieldTag = "secret,encrypt".parse().unwrap();
        assert_eq!(tag.classification, Classification::Secret);
        assert_eq!(tag.operation, Operation::Encrypt);

        let tag: FieldTag = "sensitive, hmac_sha256".parse().unwrap();
        assert_eq!(tag.classification, Classification::Sensitive);
        assert_eq!(tag.operation, Operation::HmacSha256);

        let tag: FieldTag = "public".parse().unwrap();
        assert_eq!(tag, FieldTag::public());

        // Garbage stays restrictive on both axes.
        let tag: FieldTag = "whatever,whenever".parse().unwrap();
        assert_eq!(tag.classification, Classification::Unknown);
        assert_eq!(tag.operation, Operation::NoOperation);
    }

    #[test]
    fn test_tag_serde_roundtrip() {
        let tag = FieldTag::new(Classification::Secret, Operation::HmacSha256);
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(
            json,
            r#"{"classification":"secret","operation":"hmac_sha256"}"#
        );
        let back: FieldTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
