use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::adapter::{AvailableProperties, SENTINEL_PROPERTY_ID};
use crate::errors::{OpcError, OpcResult};
use crate::variant::VariantType;

/// One property a data source advertises for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertyDescriptor {
    pub id: u32,
    pub description: String,
    /// Raw VARENUM code of the property value.
    pub declared_type: u16,
}

impl PropertyDescriptor {
    /// Resolve [`declared_type`](Self::declared_type) against the variant
    /// type table.
    ///
    /// # Errors
    /// Returns [`OpcError::UnknownVariantType`] for codes outside the table.
    pub fn data_type(&self) -> OpcResult<VariantType> {
        VariantType::try_from(self.declared_type)
    }
}

/// Validated, id-indexed property catalog for a single tag.
#[derive(Debug, Clone, Default)]
pub struct PropertyCatalog {
    entries: Vec<PropertyDescriptor>,
    by_id: HashMap<u32, usize>,
}

impl PropertyCatalog {
    /// Build a catalog from an adapter answer.
    ///
    /// A `0` identifier is dropped with a warning. Misaligned sequences and
    /// repeated identifiers are contract violations.
    ///
    /// # Errors
    /// Returns [`OpcError::InvalidCatalog`] when the answer breaks the
    /// adapter contract.
    pub fn from_available(tag: &str, available: AvailableProperties) -> OpcResult<Self> {
        let AvailableProperties {
            count,
            ids,
            descriptions,
            data_types,
        } = available;

        if ids.len() != count || descriptions.len() != count || data_types.len() != count {
            return Err(OpcError::InvalidCatalog {
                tag: tag.to_string(),
                reason: format!(
                    "count {count} disagrees with {} ids, {} descriptions, {} data types",
                    ids.len(),
                    descriptions.len(),
                    data_types.len()
                ),
            });
        }

        let mut catalog = Self::default();
        for ((id, description), declared_type) in ids.into_iter().zip(descriptions).zip(data_types)
        {
            if id == SENTINEL_PROPERTY_ID {
                tracing::warn!(tag = %tag, description = %description, "Dropping advertised property with reserved id 0");
                continue;
            }
            if catalog.by_id.contains_key(&id) {
                return Err(OpcError::InvalidCatalog {
                    tag: tag.to_string(),
                    reason: format!("property id {id} advertised more than once"),
                });
            }
            catalog.by_id.insert(id, catalog.entries.len());
            catalog.entries.push(PropertyDescriptor {
                id,
                description,
                declared_type,
            });
        }
        Ok(catalog)
    }

    pub fn get(&self, id: u32) -> Option<&PropertyDescriptor> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Identifiers in advertised order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|d| d.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_descriptors(self) -> Vec<PropertyDescriptor> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a PropertyCatalog {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Property identifiers defined by the OPC DA specification (set 1 and the
/// item description).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownProperty {
    CanonicalDataType = 1,
    Value = 2,
    Quality = 3,
    Timestamp = 4,
    AccessRights = 5,
    ScanRate = 6,
    EuType = 7,
    EuInfo = 8,
    Description = 101,
}

impl WellKnownProperty {
    pub const ALL: [Self; 9] = [
        Self::CanonicalDataType,
        Self::Value,
        Self::Quality,
        Self::Timestamp,
        Self::AccessRights,
        Self::ScanRate,
        Self::EuType,
        Self::EuInfo,
        Self::Description,
    ];

    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Description string servers report for this property.
    pub const fn description(self) -> &'static str {
        match self {
            Self::CanonicalDataType => "Item Canonical DataType",
            Self::Value => "Item Value",
            Self::Quality => "Item Quality",
            Self::Timestamp => "Item Timestamp",
            Self::AccessRights => "Item Access Rights",
            Self::ScanRate => "Server Scan Rate",
            Self::EuType => "Item EU Type",
            Self::EuInfo => "Item EUInfo",
            Self::Description => "Item Description",
        }
    }

    const fn short_name(self) -> &'static str {
        match self {
            Self::CanonicalDataType => "datatype",
            Self::Value => "value",
            Self::Quality => "quality",
            Self::Timestamp => "timestamp",
            Self::AccessRights => "access-rights",
            Self::ScanRate => "scan-rate",
            Self::EuType => "eu-type",
            Self::EuInfo => "eu-info",
            Self::Description => "description",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for WellKnownProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for WellKnownProperty {
    type Err = OpcError;

    /// Accepts the short name (`quality`, `access-rights`, ...) or the
    /// numeric identifier.
    fn from_str(s: &str) -> OpcResult<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Self::from_id(id)
                .ok_or_else(|| OpcError::InvalidArgument(format!("'{id}' is not a well-known property id")));
        }
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.short_name() == wanted)
            .ok_or_else(|| OpcError::InvalidArgument(format!("unknown property name '{s}'")))
    }
}
