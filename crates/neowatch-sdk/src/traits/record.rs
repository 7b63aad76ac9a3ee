//! Record trait for store-backed entities

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Trait for entity types stored in a record store collection.
///
/// # Example
///
/// ```rust,ignore
/// use neowatch_sdk::Record;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Sighting {
///     #[serde(rename = "_id")]
///     id: String,
///     observer: String,
/// }
///
/// impl Record for Sighting {
///     fn collection() -> &'static str { "sightings" }
///     fn record_id(&self) -> &str { &self.id }
/// }
/// ```
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Collection name in the record store (e.g., "nearearthobjects")
    fn collection() -> &'static str;

    /// The store-assigned `_id` of this record
    fn record_id(&self) -> &str;

    /// Convert to JSON for storage
    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse from a stored JSON record
    fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
