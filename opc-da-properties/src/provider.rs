use async_trait::async_trait;

use crate::adapter::StatusCode;
use crate::catalog::PropertyDescriptor;
use crate::errors::OpcResult;
use crate::normalizer::TagProperties;

#[cfg(feature = "test-support")]
use mockall::automock;

/// Async trait for tag-property operations.
///
/// This is the stable public API a transport layer (RPC proxy, CLI, ...)
/// consumes. [`PropertyGateway`](crate::PropertyGateway) provides the
/// implementation on top of a [`DataSourceAdapter`](crate::DataSourceAdapter).
#[cfg_attr(feature = "test-support", automock)]
#[async_trait]
pub trait TagPropertyProvider: Send + Sync {
    /// Normalized properties of `tag`, optionally restricted to `filter`.
    ///
    /// # Errors
    /// Returns `Err` if the data source cannot be reached, does not know the
    /// tag, or answers outside its contract.
    async fn get_tag_properties(&self, tag: &str, filter: Vec<u32>) -> OpcResult<TagProperties>;

    /// Properties the data source advertises for `tag`.
    ///
    /// # Errors
    /// Returns `Err` if the catalog cannot be fetched or declares an unknown
    /// variant type.
    async fn available_properties(&self, tag: &str) -> OpcResult<Vec<PropertyDescriptor>>;

    /// Human-readable text for a per-item status code.
    ///
    /// # Errors
    /// Returns `Err` if the data source cannot resolve the code.
    async fn error_string(&self, code: StatusCode) -> OpcResult<String>;
}
