use thiserror::Error;

use crate::helpers::friendly_hresult_hint;

/// Result type alias for tag-property operations.
pub type OpcResult<T> = Result<T, OpcError>;

/// Centralized error enum for the property gateway core.
///
/// Every variant is fatal for the request that produced it. Per-property
/// failures reported by a batched fetch are not errors at this level; they
/// travel back to the caller as [`StatusCode`](crate::StatusCode) entries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpcError {
    /// The data source adapter is unreachable or rejected the call.
    #[error("Adapter error: {0}")]
    Adapter(String),

    /// The data source does not know the requested tag.
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Server-specific errors reported via OPC status codes.
    #[error("Server error: {0} (0x{1:08X}{hint})", hint = hint_suffix(*.1))]
    Server(String, u32),

    /// A variant type code outside the supported VARENUM table.
    ///
    /// Indicates an adapter/protocol version mismatch and is never coerced
    /// into a default type name.
    #[error("Unrecognized variant type code {0} (0x{0:04X})")]
    UnknownVariantType(u16),

    /// The adapter returned a property catalog that breaks its contract.
    #[error("Invalid property catalog for '{tag}': {reason}")]
    InvalidCatalog { tag: String, reason: String },

    /// The batched fetch returned a value sequence of the wrong length.
    #[error("Batched fetch for '{tag}' returned {actual} values, expected {expected}")]
    MisalignedBatch {
        tag: String,
        expected: usize,
        actual: usize,
    },

    /// The caller passed an argument the operation cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Errors during value transcoding.
    #[error("Data conversion failed: {0}")]
    Conversion(String),

    /// Catch-all for unexpected internal failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn hint_suffix(code: u32) -> String {
    friendly_hresult_hint(code).map_or_else(String::new, |hint| format!(": {hint}"))
}

impl From<anyhow::Error> for OpcError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for OpcError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Async task join failed: {err}"))
    }
}

impl From<std::num::TryFromIntError> for OpcError {
    fn from(err: std::num::TryFromIntError) -> Self {
        Self::Conversion(format!("Integer conversion error: {err}"))
    }
}
