//! # opc-da-properties
//!
//! Tag-property normalization core for an OPC DA gateway.
//!
//! Given a [`DataSourceAdapter`] that talks to the OPC server, the
//! [`PropertyNormalizer`] fetches a tag's advertised properties, reads their
//! values in one batched round-trip and turns vendor encodings (quality,
//! access rights, canonical datatypes, timestamps) into a stable,
//! description-keyed list of [`NormalizedProperty`] values.
//!
//! ## Features
//! - `memory-backend` (default): `MemoryAdapter`, a simulated data source
//!   loadable from JSON
//! - `serde`: `Serialize` for result types, `Deserialize` for [`Value`]
//! - `test-support`: Enables `MockDataSourceAdapter` and
//!   `MockTagPropertyProvider` via `mockall`

mod adapter;
mod catalog;
mod errors;
mod gateway;
mod helpers;
mod normalizer;
mod provider;
mod quality;
mod transcode;
mod value;
mod variant;

#[cfg(feature = "memory-backend")]
mod backend;

// Stable public API
pub use adapter::{
    AvailableProperties, DataSourceAdapter, ItemProperties, PLACEHOLDER_VALUE, PropertyRequest,
    SENTINEL_PROPERTY_ID, StatusCode,
};
pub use catalog::{PropertyCatalog, PropertyDescriptor, WellKnownProperty};
pub use errors::{OpcError, OpcResult};
pub use gateway::PropertyGateway;
pub use helpers::{format_status, friendly_com_hint, friendly_hresult_hint};
pub use normalizer::{
    NormalizedProperty, PropertyNormalizer, TagProperties, VIRTUAL_PROPERTY_DESCRIPTION,
    VIRTUAL_PROPERTY_ID,
};
pub use provider::TagPropertyProvider;
pub use quality::{ACCESS_RIGHTS, OPC_QUALITY, access_rights_label, quality_label, quality_to_string};
pub use transcode::transcode;
pub use value::{DATE_FORMAT, Value};
pub use variant::{VT_ARRAY, VarEnum, VariantType};

// Backend re-exports (conditional)
#[cfg(feature = "memory-backend")]
pub use backend::memory::{MemoryAdapter, SimProperty};

// Test support re-export
#[cfg(feature = "test-support")]
pub use adapter::MockDataSourceAdapter;
#[cfg(feature = "test-support")]
pub use provider::MockTagPropertyProvider;
