use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::{DataSourceAdapter, StatusCode};
use crate::catalog::PropertyDescriptor;
use crate::errors::OpcResult;
use crate::normalizer::{PropertyNormalizer, TagProperties};
use crate::provider::TagPropertyProvider;

/// [`TagPropertyProvider`] backed by a blocking [`DataSourceAdapter`].
///
/// Each request runs the normalizer on tokio's blocking pool, so adapter
/// round-trips never stall the async runtime. Concurrent requests share the
/// adapter; it must tolerate that.
pub struct PropertyGateway<A: DataSourceAdapter + 'static> {
    normalizer: Arc<PropertyNormalizer<A>>,
}

impl<A: DataSourceAdapter + 'static> Clone for PropertyGateway<A> {
    fn clone(&self) -> Self {
        Self {
            normalizer: Arc::clone(&self.normalizer),
        }
    }
}

impl<A: DataSourceAdapter + 'static> PropertyGateway<A> {
    /// Creates a new `PropertyGateway` over the given adapter.
    pub fn new(adapter: A) -> Self {
        tracing::info!("Initializing PropertyGateway");
        Self {
            normalizer: Arc::new(PropertyNormalizer::new(adapter)),
        }
    }

    pub fn normalizer(&self) -> &PropertyNormalizer<A> {
        &self.normalizer
    }

    async fn run_blocking<F, R>(&self, operation: F) -> OpcResult<R>
    where
        F: FnOnce(&PropertyNormalizer<A>) -> OpcResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let normalizer = Arc::clone(&self.normalizer);
        tokio::task::spawn_blocking(move || operation(&normalizer)).await?
    }
}

#[async_trait]
impl<A: DataSourceAdapter + 'static> TagPropertyProvider for PropertyGateway<A> {
    async fn get_tag_properties(&self, tag: &str, filter: Vec<u32>) -> OpcResult<TagProperties> {
        let tag_owned = tag.to_string();
        self.run_blocking(move |normalizer| normalizer.get_tag_properties(&tag_owned, &filter))
            .await
    }

    async fn available_properties(&self, tag: &str) -> OpcResult<Vec<PropertyDescriptor>> {
        let tag_owned = tag.to_string();
        self.run_blocking(move |normalizer| normalizer.available_properties(&tag_owned))
            .await
    }

    async fn error_string(&self, code: StatusCode) -> OpcResult<String> {
        self.run_blocking(move |normalizer| normalizer.error_string(code))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AvailableProperties, ItemProperties, MockDataSourceAdapter};
    use crate::errors::OpcError;
    use crate::value::Value;

    fn mock_adapter() -> MockDataSourceAdapter {
        let mut mock = MockDataSourceAdapter::new();
        mock.expect_query_available_properties().returning(|tag| {
            if tag == "Missing.Tag" {
                return Err(OpcError::UnknownTag(tag.to_string()));
            }
            Ok(AvailableProperties::from_rows([
                (1, "Item Canonical DataType", 2),
                (3, "Item Quality", 2),
                (5, "Item Access Rights", 3),
            ]))
        });
        mock.expect_fetch_item_properties().returning(|_, req| {
            let values = req
                .answered_ids()
                .iter()
                .map(|id| match id {
                    1 => Value::Int(4),
                    3 => Value::Int(0),
                    _ => Value::Int(3),
                })
                .collect::<Vec<_>>();
            let errors = vec![StatusCode::OK; values.len()];
            Ok(ItemProperties { values, errors })
        });
        mock
    }

    #[tokio::test]
    async fn test_gateway_matches_normalizer() {
        let gateway = PropertyGateway::new(mock_adapter());
        let via_gateway = gateway
            .get_tag_properties("Tank.Level", vec![1, 3])
            .await
            .unwrap();
        let direct = gateway
            .normalizer()
            .get_tag_properties("Tank.Level", &[1, 3])
            .unwrap();
        assert_eq!(via_gateway, direct);
        assert_eq!(via_gateway.properties[0].value, Value::from("VT_R4"));
        assert_eq!(via_gateway.properties[1].value, Value::from("Bad"));
    }

    #[tokio::test]
    async fn test_gateway_unfiltered() {
        let gateway = PropertyGateway::new(mock_adapter());
        let result = gateway.get_tag_properties("Tank.Level", Vec::new()).await.unwrap();
        let descriptions: Vec<&str> = result
            .properties
            .iter()
            .map(|p| p.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Item ID (virtual property)",
                "Item Canonical DataType",
                "Item Quality",
                "Item Access Rights",
            ]
        );
        assert_eq!(result.properties[3].value, Value::from("Read/Write"));
    }

    #[tokio::test]
    async fn test_gateway_propagates_errors() {
        let gateway = PropertyGateway::new(mock_adapter());
        let err = gateway
            .get_tag_properties("Missing.Tag", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OpcError::UnknownTag(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_gateway_concurrent_requests() {
        let gateway = PropertyGateway::new(mock_adapter());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let gw = gateway.clone();
            handles.push(tokio::spawn(async move {
                gw.get_tag_properties("Tank.Level", vec![5]).await
            }));
        }
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.properties.len(), 1);
            assert_eq!(result.properties[0].value, Value::from("Read/Write"));
        }
    }

    #[tokio::test]
    async fn test_gateway_available_properties_and_error_string() {
        let gateway = PropertyGateway::new(mock_adapter());
        let descriptors = gateway.available_properties("Tank.Level").await.unwrap();
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[1].description, "Item Quality");

        let mut mock = MockDataSourceAdapter::new();
        mock.expect_error_string()
            .returning(|code| Ok(format!("code {}", code.0)));
        let gateway = PropertyGateway::new(mock);
        assert_eq!(
            gateway.error_string(StatusCode(42)).await.unwrap(),
            "code 42"
        );
    }
}
