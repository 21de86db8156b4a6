use graylog_core::{GraylogTimestamp, Result, require};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{RemoteResource, WriteRequest, null_as_default};
use crate::kind::ResourceKind;

pub const ROTATION_STRATEGY_CLASS: &str =
    "org.graylog2.indexer.rotation.strategies.TimeBasedSizeOptimizingStrategy";
pub const ROTATION_STRATEGY_CONFIG: &str =
    "org.graylog2.indexer.rotation.strategies.TimeBasedSizeOptimizingStrategyConfig";
pub const RETENTION_STRATEGY_CLASS: &str =
    "org.graylog2.indexer.retention.strategies.DeletionRetentionStrategy";
pub const RETENTION_STRATEGY_CONFIG: &str =
    "org.graylog2.indexer.retention.strategies.DeletionRetentionStrategyConfig";
pub const DATA_TIERING_HOT_ONLY: &str = "hot_only";

pub const DEFAULT_SHARDS: i64 = 1;
pub const DEFAULT_REPLICAS: i64 = 0;
pub const DEFAULT_INDEX_ANALYZER: &str = "standard";
pub const DEFAULT_MAX_NUM_SEGMENTS: i64 = 1;
pub const DEFAULT_FIELD_TYPE_REFRESH_INTERVAL: i64 = 5000;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn default_rotation_strategy() -> Map<String, Value> {
    object(json!({
        "type": ROTATION_STRATEGY_CONFIG,
        "index_lifetime_min": "P30D",
        "index_lifetime_max": "P40D",
    }))
}

pub fn default_retention_strategy() -> Map<String, Value> {
    object(json!({
        "type": RETENTION_STRATEGY_CONFIG,
        "max_number_of_indices": 20,
    }))
}

pub fn default_data_tiering() -> Map<String, Value> {
    object(json!({
        "type": DATA_TIERING_HOT_ONLY,
        "index_lifetime_min": "P30D",
        "index_lifetime_max": "P40D",
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub index_prefix: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shards: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub replicas: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rotation_strategy_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rotation_strategy: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retention_strategy_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retention_strategy: Map<String, Value>,
    #[serde(
        default,
        with = "graylog_core::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<GraylogTimestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub index_analyzer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub index_optimization_max_num_segments: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub index_optimization_disabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_type_refresh_interval: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writable: bool,
    #[serde(rename = "default", default, deserialize_with = "null_as_default")]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_tiering: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_legacy_rotation: bool,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Create body. Sent flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexSetRequest {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub index_prefix: String,
    pub shards: i64,
    pub replicas: i64,
    pub rotation_strategy_class: String,
    pub rotation_strategy: Map<String, Value>,
    pub retention_strategy_class: String,
    pub retention_strategy: Map<String, Value>,
    pub index_analyzer: String,
    pub index_optimization_max_num_segments: i64,
    pub index_optimization_disabled: bool,
    pub field_type_refresh_interval: i64,
    pub use_legacy_rotation: bool,
    pub writable: bool,
    pub data_tiering: Map<String, Value>,
}

/// Update body. The prefix, writability and data tiering are fixed at create.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexSetUpdateRequest {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub shards: i64,
    pub replicas: i64,
    pub rotation_strategy_class: String,
    pub rotation_strategy: Map<String, Value>,
    pub retention_strategy_class: String,
    pub retention_strategy: Map<String, Value>,
    pub index_analyzer: String,
    pub index_optimization_max_num_segments: i64,
    pub index_optimization_disabled: bool,
    pub field_type_refresh_interval: i64,
    pub use_legacy_rotation: bool,
}

impl IndexSetRequest {
    /// A create request carrying Graylog's usual defaults.
    pub fn new(title: impl Into<String>, index_prefix: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            index_prefix: index_prefix.into(),
            shards: DEFAULT_SHARDS,
            replicas: DEFAULT_REPLICAS,
            rotation_strategy_class: ROTATION_STRATEGY_CLASS.to_string(),
            rotation_strategy: default_rotation_strategy(),
            retention_strategy_class: RETENTION_STRATEGY_CLASS.to_string(),
            retention_strategy: default_retention_strategy(),
            index_analyzer: DEFAULT_INDEX_ANALYZER.to_string(),
            index_optimization_max_num_segments: DEFAULT_MAX_NUM_SEGMENTS,
            index_optimization_disabled: false,
            field_type_refresh_interval: DEFAULT_FIELD_TYPE_REFRESH_INTERVAL,
            use_legacy_rotation: false,
            writable: true,
            data_tiering: default_data_tiering(),
        }
    }

    pub fn to_update(&self) -> IndexSetUpdateRequest {
        IndexSetUpdateRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            shards: self.shards,
            replicas: self.replicas,
            rotation_strategy_class: self.rotation_strategy_class.clone(),
            rotation_strategy: self.rotation_strategy.clone(),
            retention_strategy_class: self.retention_strategy_class.clone(),
            retention_strategy: self.retention_strategy.clone(),
            index_analyzer: self.index_analyzer.clone(),
            index_optimization_max_num_segments: self.index_optimization_max_num_segments,
            index_optimization_disabled: self.index_optimization_disabled,
            field_type_refresh_interval: self.field_type_refresh_interval,
            use_legacy_rotation: self.use_legacy_rotation,
        }
    }
}

impl WriteRequest for IndexSetRequest {
    fn validate(&self) -> Result<()> {
        require("index set", "title", &self.title)?;
        require("index set", "prefix", &self.index_prefix)
    }
}

impl WriteRequest for IndexSetUpdateRequest {
    fn validate(&self) -> Result<()> {
        require("index set", "title", &self.title)
    }
}

impl RemoteResource for IndexSet {
    const KIND: ResourceKind = ResourceKind::IndexSet;

    type CreateRequest = IndexSetRequest;
    type UpdateRequest = IndexSetUpdateRequest;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = IndexSetRequest::new("App logs", "app");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["shards"], json!(1));
        assert_eq!(body["replicas"], json!(0));
        assert_eq!(body["writable"], json!(true));
        assert_eq!(body["index_analyzer"], json!("standard"));
        assert_eq!(body["field_type_refresh_interval"], json!(5000));
        assert_eq!(body["rotation_strategy"]["index_lifetime_max"], json!("P40D"));
        assert_eq!(body["retention_strategy"]["max_number_of_indices"], json!(20));
        assert_eq!(body["data_tiering"]["type"], json!("hot_only"));
        assert!(body.get("entity").is_none());
    }

    #[test]
    fn test_update_omits_create_only_fields() {
        let update = IndexSetRequest::new("App logs", "app").to_update();
        let body = serde_json::to_value(&update).unwrap();
        assert!(body.get("index_prefix").is_none());
        assert!(body.get("writable").is_none());
        assert!(body.get("data_tiering").is_none());
        assert_eq!(body["title"], json!("App logs"));
    }

    #[test]
    fn test_prefix_required_on_create() {
        let err = IndexSetRequest::new("App logs", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: index set prefix is required");
        assert!(IndexSetUpdateRequest::default().validate().is_err());
    }

    #[test]
    fn test_decode_default_flag() {
        let set: IndexSet = serde_json::from_value(json!({
            "id": "is1",
            "title": "Default index set",
            "index_prefix": "graylog",
            "default": true,
            "writable": true,
            "creation_date": "2024-01-01T00:00:00.000Z",
            "index_template_type": null
        }))
        .unwrap();
        assert!(set.is_default);
        assert!(set.creation_date.is_some());
        assert!(set.other.contains_key("index_template_type"));
    }
}
