//! # Error Types
//!
//! Errors an adapter may raise while answering the capability trait or
//! running its native validator. The engines never let these escape:
//! the compiler degrades the offending node to `{}` and the validator
//! normalizer turns them into a single-issue failure.

use thiserror::Error;

/// Error raised by a vendor adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The node claimed by the adapter is structurally broken
    /// (e.g. a lazy getter that was never defined).
    #[error("malformed {vendor} schema: {reason}")]
    Malformed {
        /// Vendor name of the adapter that raised the error.
        vendor: String,
        /// What is wrong with the node.
        reason: String,
    },

    /// The adapter does not implement the requested operation.
    #[error("{vendor} adapter does not support {operation}")]
    Unsupported {
        /// Vendor name of the adapter.
        vendor: String,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// The vendor's own validator raised instead of returning a result.
    #[error("{vendor} validator raised: {message}")]
    Native {
        /// Vendor name of the adapter.
        vendor: String,
        /// Message carried by the vendor exception.
        message: String,
    },
}

impl AdapterError {
    /// Shorthand for [`AdapterError::Malformed`].
    pub fn malformed(vendor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            vendor: vendor.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`AdapterError::Native`].
    pub fn native(vendor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            vendor: vendor.into(),
            message: message.into(),
        }
    }

    /// Vendor that raised the error.
    pub fn vendor(&self) -> &str {
        match self {
            Self::Malformed { vendor, .. }
            | Self::Unsupported { vendor, .. }
            | Self::Native { vendor, .. } => vendor,
        }
    }

    /// Human-readable text for a validation issue.
    ///
    /// Vendor exceptions surface their own message verbatim; other variants
    /// use the full `Display` rendering.
    pub fn message(&self) -> String {
        match self {
            Self::Native { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_message_is_verbatim() {
        let err = AdapterError::native("joi", "\"value\" must be a string");
        assert_eq!(err.message(), "\"value\" must be a string");
        assert_eq!(err.vendor(), "joi");
    }

    #[test]
    fn malformed_display_names_vendor() {
        let err = AdapterError::malformed("zod", "lazy getter returned nothing");
        assert_eq!(
            err.to_string(),
            "malformed zod schema: lazy getter returned nothing"
        );
        assert_eq!(err.message(), err.to_string());
    }

    #[test]
    fn unsupported_display() {
        let err = AdapterError::Unsupported {
            vendor: "typebox".to_string(),
            operation: "validate",
        };
        assert_eq!(err.to_string(), "typebox adapter does not support validate");
    }
}
