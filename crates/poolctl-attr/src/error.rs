//! Error types for attribute resolution and encoding.

use thiserror::Error;

use crate::catalog::ValueKind;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, AttrError>;

/// Errors raised while resolving or encoding an attribute.
#[derive(Debug, Error)]
pub enum AttrError {
    /// Keyword is not in the catalog and is not a numeric type code.
    #[error("unrecognized attribute")]
    UnknownAttribute {
        /// Keyword supplied by the caller.
        keyword: String,
    },
    /// Declared value kind conflicts with the catalog entry.
    #[error("attribute value kind mismatch")]
    TypeMismatch {
        /// Keyword supplied by the caller.
        keyword: String,
        /// Value kind the catalog expects.
        expected: ValueKind,
    },
    /// Raw value could not be encoded for the resolved kind.
    #[error("invalid attribute value")]
    Encoding {
        /// Keyword supplied by the caller.
        keyword: String,
        /// Offending raw value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}
