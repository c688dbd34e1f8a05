//! Boundary to the data source that actually talks to the OPC server.
//!
//! Implementations own COM activation, marshalling and transport. The core
//! only sees the two property calls and the shapes defined here.

use std::fmt;

use crate::errors::OpcResult;
use crate::helpers::format_status;
use crate::value::Value;

#[cfg(any(test, feature = "test-support"))]
use mockall::automock;

/// Reserved identifier leading a filtered batched-fetch payload.
pub const SENTINEL_PROPERTY_ID: u32 = 0;

/// Value paired with the leading slot of an unfiltered request.
pub const PLACEHOLDER_VALUE: Value = Value::Int(0);

/// Raw answer to [`DataSourceAdapter::query_available_properties`].
///
/// The three sequences are positionally aligned and `count` long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableProperties {
    pub count: usize,
    pub ids: Vec<u32>,
    pub descriptions: Vec<String>,
    pub data_types: Vec<u16>,
}

impl AvailableProperties {
    /// Build from `(id, description, data_type)` rows.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (u32, S, u16)>,
        S: Into<String>,
    {
        let mut available = Self::default();
        for (id, description, data_type) in rows {
            available.ids.push(id);
            available.descriptions.push(description.into());
            available.data_types.push(data_type);
        }
        available.count = available.ids.len();
        available
    }
}

/// Per-item status code returned alongside a batched fetch.
///
/// Follows HRESULT conventions: the high bit marks a failure.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const OK: Self = Self(0);
    /// `OPC_E_INVALID_PID`
    pub const INVALID_PID: Self = Self(0xC004_0203);

    pub const fn is_ok(self) -> bool {
        self.0 & 0x8000_0000 == 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_status(self.0))
    }
}

/// Raw answer to [`DataSourceAdapter::fetch_item_properties`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemProperties {
    /// One value per requested item, aligned with
    /// [`PropertyRequest::wire_ids`]`[1..]`.
    pub values: Vec<Value>,
    /// Per-item status codes, passed through to the caller untouched.
    pub errors: Vec<StatusCode>,
}

/// A batched property fetch in the adapter's calling convention.
///
/// The adapter expects an item count plus an identifier list whose first
/// slot is a placeholder: it answers for `wire_ids()[1..]` only. A filtered
/// request reserves that slot with [`SENTINEL_PROPERTY_ID`]; an unfiltered
/// one lets the first advertised identifier occupy it, and that identifier
/// is later paired with [`PLACEHOLDER_VALUE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRequest {
    ids: Vec<u32>,
    sentinel: bool,
}

impl PropertyRequest {
    /// Request for every advertised identifier (no caller filter).
    pub fn all(ids: Vec<u32>) -> Self {
        Self {
            ids,
            sentinel: false,
        }
    }

    /// Request for a filtered identifier subset.
    pub fn filtered(ids: Vec<u32>) -> Self {
        Self {
            ids,
            sentinel: true,
        }
    }

    /// Working identifiers, never including the sentinel.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Number of items the adapter answers for.
    pub fn item_count(&self) -> usize {
        if self.sentinel {
            self.ids.len()
        } else {
            self.ids.len().saturating_sub(1)
        }
    }

    /// Payload identifier list, led by the placeholder slot.
    pub fn wire_ids(&self) -> Vec<u32> {
        if self.sentinel {
            std::iter::once(SENTINEL_PROPERTY_ID)
                .chain(self.ids.iter().copied())
                .collect()
        } else {
            self.ids.clone()
        }
    }

    /// Identifiers the adapter returns values for, in order.
    pub fn answered_ids(&self) -> &[u32] {
        if self.sentinel {
            &self.ids
        } else {
            self.ids.get(1..).unwrap_or_default()
        }
    }

    /// Pair working identifiers with fetched values.
    ///
    /// Returns `None` when `values` is not [`item_count`](Self::item_count)
    /// long.
    pub fn pair(&self, values: Vec<Value>) -> Option<Vec<(u32, Value)>> {
        if values.len() != self.item_count() {
            return None;
        }
        let head = (!self.sentinel && !self.ids.is_empty()).then_some(PLACEHOLDER_VALUE);
        Some(
            self.ids
                .iter()
                .copied()
                .zip(head.into_iter().chain(values))
                .collect(),
        )
    }
}

/// Synchronous data source operations the normalizer depends on.
///
/// Calls are blocking round-trips. Implementations must tolerate concurrent
/// invocation if they are shared across threads.
#[cfg_attr(any(test, feature = "test-support"), automock)]
pub trait DataSourceAdapter: Send + Sync {
    /// List every property the source advertises for `tag`.
    ///
    /// # Errors
    /// Returns `Err` if the tag is unknown or the source is unreachable.
    fn query_available_properties(&self, tag: &str) -> OpcResult<AvailableProperties>;

    /// Fetch values for `request.wire_ids()[1..]` in one round-trip.
    ///
    /// # Errors
    /// Returns `Err` only when the whole batch fails; per-item failures
    /// belong in [`ItemProperties::errors`].
    fn fetch_item_properties(
        &self,
        tag: &str,
        request: &PropertyRequest,
    ) -> OpcResult<ItemProperties>;

    /// Human-readable text for a status code.
    fn error_string(&self, code: StatusCode) -> OpcResult<String> {
        Ok(code.to_string())
    }
}
