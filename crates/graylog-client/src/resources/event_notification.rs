use graylog_core::{Result, require};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{RemoteResource, ShareRequest, WriteRequest, null_as_default};
use crate::kind::ResourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Map<String, Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl EventNotification {
    /// The notification type, `config.type`.
    pub fn notification_type(&self) -> Option<&str> {
        self.config.get("type").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventNotificationRequest {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub config: Map<String, Value>,
    #[serde(skip)]
    pub share_request: Option<ShareRequest>,
}

impl EventNotificationRequest {
    pub fn notification_type(&self) -> &str {
        self.config.get("type").and_then(Value::as_str).unwrap_or_default()
    }
}

impl WriteRequest for EventNotificationRequest {
    fn validate(&self) -> Result<()> {
        require("event notification", "title", &self.title)?;
        require("event notification", "type", self.notification_type())
    }

    fn share_request(&self) -> Option<&ShareRequest> {
        self.share_request.as_ref()
    }
}

impl RemoteResource for EventNotification {
    const KIND: ResourceKind = ResourceKind::EventNotification;

    type CreateRequest = EventNotificationRequest;
    type UpdateRequest = EventNotificationRequest;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> &str {
        &self.title
    }
}
