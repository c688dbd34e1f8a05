use indexmap::IndexMap;

use crate::adapter::{DataSourceAdapter, ItemProperties, PropertyRequest, StatusCode};
use crate::catalog::{PropertyCatalog, PropertyDescriptor};
use crate::errors::{OpcError, OpcResult};
use crate::transcode::transcode;
use crate::value::Value;
use crate::variant::{VarEnum, VariantType};

/// Identifier of the synthetic "Item ID" entry.
pub const VIRTUAL_PROPERTY_ID: u32 = 0;

/// Description of the synthetic "Item ID" entry.
pub const VIRTUAL_PROPERTY_DESCRIPTION: &str = "Item ID (virtual property)";

/// One normalized property of a tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NormalizedProperty {
    pub id: u32,
    pub description: String,
    /// Display-ready value.
    pub value: Value,
    /// Declared type of the property; `None` for the virtual entry.
    pub data_type: Option<VariantType>,
}

impl NormalizedProperty {
    /// The `(id, description, value)` triple.
    pub fn as_tuple(&self) -> (u32, &str, &Value) {
        (self.id, &self.description, &self.value)
    }

    fn virtual_item_id(tag: &str) -> Self {
        Self {
            id: VIRTUAL_PROPERTY_ID,
            description: VIRTUAL_PROPERTY_DESCRIPTION.to_string(),
            value: Value::from(tag),
            data_type: None,
        }
    }
}

/// Result of [`PropertyNormalizer::get_tag_properties`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TagProperties {
    /// Normalized properties in first-seen description order.
    pub properties: Vec<NormalizedProperty>,
    /// Per-item status codes from the batched fetch, verbatim.
    pub errors: Vec<StatusCode>,
}

impl TagProperties {
    pub fn get(&self, description: &str) -> Option<&NormalizedProperty> {
        self.properties.iter().find(|p| p.description == description)
    }
}

/// Turns raw adapter answers into normalized tag properties.
///
/// Holds no per-request state; every call performs two blocking adapter
/// round-trips (catalog, then batched values).
#[derive(Debug)]
pub struct PropertyNormalizer<A> {
    adapter: A,
}

impl<A: DataSourceAdapter> PropertyNormalizer<A> {
    pub fn new(adapter: A) -> Self {
        if let Err(err) = VarEnum::verify_table() {
            tracing::error!(error = %err, "Variant type table is inconsistent");
        }
        Self { adapter }
    }

    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Fetch and validate the property catalog for `tag`.
    ///
    /// # Errors
    /// Propagates adapter failures unchanged; see also
    /// [`PropertyCatalog::from_available`].
    pub fn catalog(&self, tag: &str) -> OpcResult<PropertyCatalog> {
        check_tag(tag)?;
        let available = self.adapter.query_available_properties(tag)?;
        PropertyCatalog::from_available(tag, available)
    }

    /// Advertised properties of `tag`, in adapter order.
    ///
    /// Fails on declared types outside the variant table, like
    /// [`get_tag_properties`](Self::get_tag_properties) does.
    pub fn available_properties(&self, tag: &str) -> OpcResult<Vec<PropertyDescriptor>> {
        let span = tracing::info_span!("opc.available_properties", tag = %tag);
        let _enter = span.enter();

        let catalog = self.catalog(tag)?;
        for descriptor in &catalog {
            descriptor.data_type()?;
        }
        tracing::debug!(count = catalog.len(), "available_properties completed");
        Ok(catalog.into_descriptors())
    }

    /// Normalized properties of `tag`.
    ///
    /// An empty `filter` selects every advertised property and adds the
    /// virtual `Item ID` entry first. A non-empty `filter` selects the
    /// advertised properties it names; unknown identifiers are ignored.
    ///
    /// When the request leaves no item to answer (empty catalog, a filter
    /// matching nothing, or a single-entry unfiltered catalog) the batched
    /// fetch is skipped and the adapter sees only the catalog query.
    ///
    /// Slots the adapter reports with a failed [`StatusCode`] keep their raw
    /// value; only successful slots are transcoded.
    ///
    /// # Errors
    /// Adapter failures, catalog contract violations, misaligned batches,
    /// unknown variant types and untranscodable values abort the request.
    pub fn get_tag_properties(&self, tag: &str, filter: &[u32]) -> OpcResult<TagProperties> {
        let span = tracing::info_span!("opc.get_tag_properties", tag = %tag, filtered = !filter.is_empty());
        let _enter = span.enter();

        let catalog = self.catalog(tag)?;

        let request = if filter.is_empty() {
            PropertyRequest::all(catalog.ids().filter(|&id| id > VIRTUAL_PROPERTY_ID).collect())
        } else {
            PropertyRequest::filtered(catalog.ids().filter(|id| filter.contains(id)).collect())
        };

        let ItemProperties { values, errors } = if request.item_count() == 0 {
            tracing::debug!("Nothing to fetch, skipping batched read");
            ItemProperties::default()
        } else {
            self.adapter.fetch_item_properties(tag, &request)?
        };

        for (id, status) in request.answered_ids().iter().zip(&errors) {
            if !status.is_ok() {
                tracing::warn!(tag = %tag, property_id = id, error = %status, "Per-property fetch error");
            }
        }

        let actual = values.len();
        let pairs = request.pair(values).ok_or_else(|| OpcError::MisalignedBatch {
            tag: tag.to_string(),
            expected: request.item_count(),
            actual,
        })?;

        let mut result: IndexMap<String, NormalizedProperty> = IndexMap::new();
        if filter.is_empty() {
            let entry = NormalizedProperty::virtual_item_id(tag);
            result.insert(entry.description.clone(), entry);
        }

        // The unfiltered placeholder slot has no status of its own.
        let leading = request.ids().len() - request.answered_ids().len();
        for (slot, (id, raw)) in pairs.into_iter().enumerate() {
            let descriptor = catalog.get(id).ok_or_else(|| {
                OpcError::Internal(format!("property id {id} missing from catalog of '{tag}'"))
            })?;
            let data_type = descriptor.data_type()?;
            let failed = slot
                .checked_sub(leading)
                .and_then(|idx| errors.get(idx))
                .is_some_and(|status| !status.is_ok());
            let value = if failed {
                raw
            } else {
                transcode(&descriptor.description, raw)?
            };
            result.insert(
                descriptor.description.clone(),
                NormalizedProperty {
                    id,
                    description: descriptor.description.clone(),
                    value,
                    data_type: Some(data_type),
                },
            );
        }

        let properties: Vec<NormalizedProperty> = result.into_values().collect();
        tracing::debug!(
            count = properties.len(),
            errors = errors.len(),
            "get_tag_properties completed"
        );
        Ok(TagProperties { properties, errors })
    }

    /// Human-readable text for a per-item status code.
    pub fn error_string(&self, code: StatusCode) -> OpcResult<String> {
        self.adapter.error_string(code)
    }
}

fn check_tag(tag: &str) -> OpcResult<()> {
    if tag.is_empty() {
        return Err(OpcError::InvalidArgument("tag name is empty".into()));
    }
    Ok(())
}
