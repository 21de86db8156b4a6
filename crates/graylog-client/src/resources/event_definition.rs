use graylog_core::{GraylogTimestamp, Result, require};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{RemoteResource, ShareRequest, WriteRequest, null_as_default};
use crate::kind::ResourceKind;

/// An event definition as Graylog reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alert: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_settings: NotificationSettings,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notifications: Vec<NotificationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        default,
        with = "graylog_core::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<GraylogTimestamp>,
    #[serde(
        default,
        with = "graylog_core::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub matched_at: Option<GraylogTimestamp>,
    /// Fields this client does not model, kept as received.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl EventDefinition {
    /// The event processor type, `config.type`.
    pub fn config_type(&self) -> Option<&str> {
        self.config.get("type").and_then(Value::as_str)
    }

    pub fn notification_ids(&self) -> Vec<String> {
        self.notifications
            .iter()
            .map(|n| n.notification_id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub grace_period_ms: i64,
    #[serde(default)]
    pub backlog_size: i64,
}

/// Link from an event definition to an event notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_id: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl NotificationRef {
    pub fn new(notification_id: impl Into<String>) -> Self {
        Self {
            notification_id: notification_id.into(),
            other: Map::new(),
        }
    }
}

/// Entity sent on create and update, wrapped in `{entity, share_request?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventDefinitionRequest {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub priority: i64,
    pub alert: bool,
    pub config: Map<String, Value>,
    pub field_spec: Map<String, Value>,
    pub key_spec: Vec<Value>,
    pub notification_settings: NotificationSettings,
    pub notifications: Vec<NotificationRef>,
    pub storage: Vec<Value>,
    #[serde(skip)]
    pub share_request: Option<ShareRequest>,
}

impl EventDefinitionRequest {
    pub fn config_type(&self) -> &str {
        self.config.get("type").and_then(Value::as_str).unwrap_or_default()
    }

    /// Attach notifications; `alert` follows whether any are attached.
    pub fn with_notifications<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notifications = ids.into_iter().map(NotificationRef::new).collect();
        self.alert = !self.notifications.is_empty();
        self
    }
}

impl WriteRequest for EventDefinitionRequest {
    fn validate(&self) -> Result<()> {
        require("event definition", "title", &self.title)?;
        require("event definition", "config type", self.config_type())
    }

    fn share_request(&self) -> Option<&ShareRequest> {
        self.share_request.as_ref()
    }
}

impl RemoteResource for EventDefinition {
    const KIND: ResourceKind = ResourceKind::EventDefinition;

    type CreateRequest = EventDefinitionRequest;
    type UpdateRequest = EventDefinitionRequest;

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
    use serde_json::json;

    #[test]
    fn test_decode_keeps_unknown_fields() {
        let def: EventDefinition = serde_json::from_value(json!({
            "id": "ed1",
            "title": "Failed logins",
            "description": null,
            "priority": 2,
            "alert": true,
            "config": {"type": "aggregation-v1", "query": "action:login"},
            "notification_settings": {"grace_period_ms": 300000, "backlog_size": 5},
            "notifications": [{"notification_id": "n1", "notification_parameters": null}],
            "state": "ENABLED",
            "updated_at": "2024-03-01T10:00:00.000Z",
            "matched_at": null,
            "_scope": "DEFAULT"
        }))
        .unwrap();

        assert_eq!(def.description, "");
        assert_eq!(def.config_type(), Some("aggregation-v1"));
        assert_eq!(def.notification_ids(), vec!["n1".to_string()]);
        assert_eq!(def.notification_settings.grace_period_ms, 300000);
        assert_eq!(def.other.get("_scope"), Some(&json!("DEFAULT")));
        assert!(def.matched_at.is_none());
        assert_eq!(
            def.updated_at.map(|t| t.to_string()).as_deref(),
            Some("2024-03-01T10:00:00.000Z")
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let mut config = Map::new();
        config.insert("type".to_string(), json!("aggregation-v1"));
        let request = EventDefinitionRequest {
            title: "Failed logins".to_string(),
            priority: 2,
            config,
            ..Default::default()
        }
        .with_notifications(["n1"]);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["alert"], json!(true));
        assert_eq!(body["notifications"], json!([{"notification_id": "n1"}]));
        assert_eq!(body["field_spec"], json!({}));
        assert_eq!(body["key_spec"], json!([]));
        assert_eq!(body["storage"], json!([]));
        assert_eq!(
            body["notification_settings"],
            json!({"grace_period_ms": 0, "backlog_size": 0})
        );
        assert!(body.get("description").is_none());
        assert!(body.get("share_request").is_none());
    }

    #[test]
    fn test_validation() {
        assert!(EventDefinitionRequest::default().validate().is_err());

        let request = EventDefinitionRequest {
            title: "x".to_string(),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: event definition config type is required"
        );
    }
}
