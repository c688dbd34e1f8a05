//! In-memory simulated data source.
//!
//! Answers property queries from a fixed table, following the same batched
//! fetch convention as a live OPC server (the leading payload slot is never
//! answered). Useful for demos, tests and offline development.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::adapter::{
    AvailableProperties, DataSourceAdapter, ItemProperties, PropertyRequest, StatusCode,
};
use crate::errors::{OpcError, OpcResult};
use crate::helpers::format_status;
use crate::value::Value;

/// One simulated property of a tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimProperty {
    pub id: u32,
    pub description: String,
    /// VARENUM code advertised for the property.
    pub data_type: u16,
    #[serde(default = "empty_value")]
    pub value: Value,
    /// Per-item status reported when the property is fetched.
    #[serde(default)]
    pub status: StatusCode,
}

const fn empty_value() -> Value {
    Value::Empty
}

#[derive(Debug, Deserialize)]
struct Fixture {
    tags: HashMap<String, Vec<SimProperty>>,
    #[serde(default)]
    error_strings: HashMap<u32, String>,
}

/// [`DataSourceAdapter`] over an in-memory property table.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    tags: HashMap<String, Vec<SimProperty>>,
    error_strings: HashMap<u32, String>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a tag and its properties.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>, properties: Vec<SimProperty>) -> Self {
        self.tags.insert(tag.into(), properties);
        self
    }

    /// Register vendor text for a status code.
    #[must_use]
    pub fn with_error_string(mut self, code: u32, text: impl Into<String>) -> Self {
        self.error_strings.insert(code, text.into());
        self
    }

    /// Parse a JSON fixture.
    ///
    /// ```json
    /// {
    ///   "tags": {
    ///     "Random.Int4": [
    ///       { "id": 1, "description": "Item Canonical DataType", "data_type": 2, "value": { "int": 3 } }
    ///     ]
    ///   },
    ///   "error_strings": { "3221488131": "The property is not available" }
    /// }
    /// ```
    pub fn from_json_str(json: &str) -> OpcResult<Self> {
        let fixture: Fixture = serde_json::from_str(json)
            .map_err(|e| OpcError::Adapter(format!("invalid simulation fixture: {e}")))?;
        tracing::debug!(tags = fixture.tags.len(), "Loaded simulation fixture");
        Ok(Self {
            tags: fixture.tags,
            error_strings: fixture.error_strings,
        })
    }

    /// Read and parse a JSON fixture file.
    pub fn from_path(path: impl AsRef<Path>) -> OpcResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            OpcError::Adapter(format!("cannot read fixture '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Tag names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn properties(&self, tag: &str) -> OpcResult<&[SimProperty]> {
        self.tags
            .get(tag)
            .map(Vec::as_slice)
            .ok_or_else(|| OpcError::UnknownTag(tag.to_string()))
    }
}

impl DataSourceAdapter for MemoryAdapter {
    fn query_available_properties(&self, tag: &str) -> OpcResult<AvailableProperties> {
        let properties = self.properties(tag)?;
        Ok(AvailableProperties::from_rows(
            properties
                .iter()
                .map(|p| (p.id, p.description.as_str(), p.data_type)),
        ))
    }

    fn fetch_item_properties(
        &self,
        tag: &str,
        request: &PropertyRequest,
    ) -> OpcResult<ItemProperties> {
        let properties = self.properties(tag)?;
        let wire_ids = request.wire_ids();
        let answered = wire_ids
            .get(1..=request.item_count())
            .ok_or_else(|| OpcError::InvalidArgument("item count exceeds payload".into()))?;

        let mut out = ItemProperties::default();
        for id in answered {
            match properties.iter().find(|p| p.id == *id) {
                Some(p) => {
                    out.values.push(p.value.clone());
                    out.errors.push(p.status);
                }
                None => {
                    out.values.push(Value::Empty);
                    out.errors.push(StatusCode::INVALID_PID);
                }
            }
        }
        Ok(out)
    }

    fn error_string(&self, code: StatusCode) -> OpcResult<String> {
        Ok(self
            .error_strings
            .get(&code.0)
            .cloned()
            .unwrap_or_else(|| format_status(code.0)))
    }
}
