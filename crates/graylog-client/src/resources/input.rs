use graylog_core::{GraylogTimestamp, Result, require};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{RemoteResource, WriteRequest, null_as_default};
use crate::kind::ResourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub input_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub global: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<String>,
    #[serde(
        default,
        with = "graylog_core::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<GraylogTimestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configuration: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_pack: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Input {
    /// The input's settings. Graylog reports them under `attributes`; older
    /// responses use `configuration`.
    pub fn settings(&self) -> &Map<String, Value> {
        if self.attributes.is_empty() {
            &self.configuration
        } else {
            &self.attributes
        }
    }
}

/// Create and update body. Sent flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub global: bool,
    pub configuration: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl WriteRequest for InputRequest {
    fn validate(&self) -> Result<()> {
        require("input", "title", &self.title)?;
        require("input", "type", &self.input_type)
    }
}

impl RemoteResource for Input {
    const KIND: ResourceKind = ResourceKind::Input;

    type CreateRequest = InputRequest;
    type UpdateRequest = InputRequest;

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
    fn test_settings_prefers_attributes() {
        let input: Input = serde_json::from_value(json!({
            "id": "in1",
            "title": "syslog-in",
            "type": "org.graylog2.inputs.syslog.udp.SyslogUDPInput",
            "global": true,
            "attributes": {"port": 514},
            "configuration": {"port": 1514},
            "created_at": "2024-05-01T12:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(input.settings().get("port"), Some(&json!(514)));
    }

    #[test]
    fn test_settings_falls_back_to_configuration() {
        let input: Input = serde_json::from_value(json!({
            "id": "in1",
            "title": "syslog-in",
            "type": "x",
            "attributes": null,
            "configuration": {"port": 1514}
        }))
        .unwrap();
        assert_eq!(input.settings().get("port"), Some(&json!(1514)));
    }

    #[test]
    fn test_node_omitted_when_unset() {
        let request = InputRequest {
            title: "syslog-in".to_string(),
            input_type: "x".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("node").is_none());
        assert_eq!(body["type"], json!("x"));
        assert_eq!(body["configuration"], json!({}));
    }
}
