//! Value accessor over one record field
//!
//! The external walker hands the filter a [`FieldRef`] for each leaf field
//! it discovers. The supported shapes form a closed set: textual, binary,
//! or absent. Anything else is a typed failure, never a panic; the walker
//! may legitimately encounter fields it can locate but not rewrite
//! (`ReadOnly`) or whose type falls outside the protected set
//! (`Unsupported`).

use crate::error::{Error, Result};

/// Mutable, shape-restricted handle to one field's in-memory value.
#[derive(Debug)]
pub enum FieldRef<'a> {
    /// No value is present (unset optional field). Every transform is a
    /// no-op success for an absent field.
    Absent,
    /// Textual field, rewritten in place.
    Text(&'a mut String),
    /// Raw binary field. An empty vec is "zero-length but present",
    /// distinct from `Absent`.
    Bytes(&'a mut Vec<u8>),
    /// The walker located the field but holds a non-writable reference.
    /// Content is readable; any attempt to write fails.
    ReadOnly(&'a str),
    /// The field's shape is neither textual nor binary.
    Unsupported,
}

impl FieldRef<'_> {
    /// Current content as a byte sequence, or `None` when no readable
    /// value is present.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            FieldRef::Text(s) => Some(s.as_bytes()),
            FieldRef::Bytes(b) => Some(b.as_slice()),
            FieldRef::ReadOnly(s) => Some(s.as_bytes()),
            FieldRef::Absent | FieldRef::Unsupported => None,
        }
    }

    /// Returns true when no value is present at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldRef::Absent)
    }

    /// Returns true when the shape is one the filter can protect.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldRef::Unsupported)
    }

    /// Overwrite the field with `new_value`.
    ///
    /// The write is all-or-nothing: on failure the prior content is
    /// untouched. Fails with "field value is not a string or binary" for
    /// an unsupported shape and "unable to set value" when the reference
    /// is not writable.
    pub fn set(&mut self, new_value: &str) -> Result<()> {
        match self {
            FieldRef::Text(s) => {
                **s = new_value.to_string();
                Ok(())
            }
            FieldRef::Bytes(b) => {
                **b = new_value.as_bytes().to_vec();
                Ok(())
            }
            FieldRef::Unsupported => Err(Error::InvalidParameter(
                "field value is not a string or binary".to_string(),
            )),
            FieldRef::Absent | FieldRef::ReadOnly(_) => Err(Error::InvalidParameter(
                "unable to set value".to_string(),
            )),
        }
    }
}
