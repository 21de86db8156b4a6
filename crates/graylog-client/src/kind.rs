use std::fmt;
use std::str::FromStr;

use graylog_core::GraylogError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Config type whose event definitions need the aggregation fields present.
pub const AGGREGATION_V1: &str = "aggregation-v1";

/// The kinds of remote resource this client manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    EventDefinition,
    EventNotification,
    IndexSet,
    Input,
}

/// Static per-kind protocol table.
pub struct KindDescriptor {
    pub kind: ResourceKind,
    /// Human label used in errors and logs.
    pub label: &'static str,
    pub collection: &'static str,
    /// Field of the list response holding the records.
    pub list_field: &'static str,
    /// Whether create/update bodies are wrapped as `{entity, share_request?}`.
    pub enveloped: bool,
    /// Always re-fetch after create, even when the response is complete.
    pub confirm_after_create: bool,
    /// Always re-fetch after update, even when the response is complete.
    pub confirm_after_update: bool,
    /// Name of the field that selects the remote implementation.
    pub discriminator: &'static str,
    /// Structurally required config entries for a given discriminator value.
    pub config_defaults: fn(&str) -> Map<String, Value>,
}

static EVENT_DEFINITION: KindDescriptor = KindDescriptor {
    kind: ResourceKind::EventDefinition,
    label: "event definition",
    collection: "events/definitions",
    list_field: "event_definitions",
    enveloped: true,
    confirm_after_create: false,
    confirm_after_update: true,
    discriminator: "config.type",
    config_defaults: event_definition_defaults,
};

static EVENT_NOTIFICATION: KindDescriptor = KindDescriptor {
    kind: ResourceKind::EventNotification,
    label: "event notification",
    collection: "events/notifications",
    list_field: "notifications",
    enveloped: true,
    confirm_after_create: false,
    confirm_after_update: false,
    discriminator: "config.type",
    config_defaults: no_defaults,
};

static INDEX_SET: KindDescriptor = KindDescriptor {
    kind: ResourceKind::IndexSet,
    label: "index set",
    collection: "system/indices/index_sets",
    list_field: "index_sets",
    enveloped: false,
    confirm_after_create: false,
    confirm_after_update: false,
    discriminator: "index_prefix",
    config_defaults: no_defaults,
};

static INPUT: KindDescriptor = KindDescriptor {
    kind: ResourceKind::Input,
    label: "input",
    collection: "system/inputs",
    list_field: "inputs",
    enveloped: false,
    confirm_after_create: true,
    confirm_after_update: true,
    discriminator: "type",
    config_defaults: no_defaults,
};

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::EventDefinition,
        ResourceKind::EventNotification,
        ResourceKind::IndexSet,
        ResourceKind::Input,
    ];

    pub fn descriptor(self) -> &'static KindDescriptor {
        match self {
            Self::EventDefinition => &EVENT_DEFINITION,
            Self::EventNotification => &EVENT_NOTIFICATION,
            Self::IndexSet => &INDEX_SET,
            Self::Input => &INPUT,
        }
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EventDefinition => "event_definition",
            Self::EventNotification => "event_notification",
            Self::IndexSet => "index_set",
            Self::Input => "input",
        }
    }
}

impl KindDescriptor {
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }

    /// Plural label, e.g. `"index sets"`.
    pub fn plural(&self) -> String {
        format!("{}s", self.label)
    }
}

impl fmt::Debug for KindDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDescriptor")
            .field("kind", &self.kind)
            .field("collection", &self.collection)
            .field("enveloped", &self.enveloped)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = GraylogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| GraylogError::validation(format!("unknown resource kind: {s}")))
    }
}

fn no_defaults(_: &str) -> Map<String, Value> {
    Map::new()
}

fn event_definition_defaults(config_type: &str) -> Map<String, Value> {
    if config_type != AGGREGATION_V1 {
        return Map::new();
    }
    let defaults = json!({
        "query": "",
        "streams": [],
        "group_by": [],
        "series": [],
        "conditions": {},
        "search_within_ms": 60000,
        "execute_every_ms": 60000,
        "event_limit": 1,
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Insert every default whose key is not already present.
pub fn backfill(config: &mut Map<String, Value>, defaults: Map<String, Value>) -> Vec<String> {
    let mut filled = Vec::new();
    for (key, value) in defaults {
        if !config.contains_key(&key) {
            filled.push(key.clone());
            config.insert(key, value);
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table() {
        let input = ResourceKind::Input.descriptor();
        assert_eq!(input.collection, "system/inputs");
        assert_eq!(input.list_field, "inputs");
        assert!(!input.enveloped);
        assert!(input.confirm_after_create && input.confirm_after_update);

        let def = ResourceKind::EventDefinition.descriptor();
        assert!(def.enveloped);
        assert!(!def.confirm_after_create);
        assert!(def.confirm_after_update);

        assert_eq!(
            ResourceKind::IndexSet.descriptor().item_path("abc"),
            "system/indices/index_sets/abc"
        );
        assert_eq!(ResourceKind::EventNotification.descriptor().list_field, "notifications");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("input".parse::<ResourceKind>().unwrap(), ResourceKind::Input);
        assert_eq!(
            "event-definition".parse::<ResourceKind>().unwrap(),
            ResourceKind::EventDefinition
        );
        assert_eq!("Index Set".parse::<ResourceKind>().unwrap(), ResourceKind::IndexSet);
        assert!("dashboard".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_aggregation_defaults() {
        let defaults = (ResourceKind::EventDefinition.descriptor().config_defaults)(AGGREGATION_V1);
        assert_eq!(defaults.len(), 8);
        assert_eq!(defaults["search_within_ms"], json!(60000));
        assert_eq!(defaults["conditions"], json!({}));

        let none = (ResourceKind::EventDefinition.descriptor().config_defaults)("correlation-v1");
        assert!(none.is_empty());
    }

    #[test]
    fn test_backfill_keeps_declared_values() {
        let mut config = Map::new();
        config.insert("query".to_string(), json!("source:fw"));
        let filled = backfill(&mut config, event_definition_defaults(AGGREGATION_V1));
        assert_eq!(config["query"], json!("source:fw"));
        assert_eq!(config["event_limit"], json!(1));
        assert!(!filled.contains(&"query".to_string()));
        assert_eq!(filled.len(), 7);
    }
}
