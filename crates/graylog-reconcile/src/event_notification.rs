use async_trait::async_trait;
use graylog_client::{
    EventNotification, EventNotificationRequest, GraylogClient, ResourceClient, ResourceKind,
    ShareRequest,
};
use graylog_core::{ConfigMap, DeclaredConfig, Result, coerce_to_json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reconciler::{Reconciler, gone, refresh, settle, track};

/// Declared event notification. `notification_type` is sent as `config.type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventNotificationSpec {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub config: DeclaredConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_request: Option<ShareRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventNotificationState {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub notification_type: String,
    #[serde(default)]
    pub config: ConfigMap,
}

impl EventNotificationSpec {
    pub fn to_request(&self) -> EventNotificationRequest {
        let mut config = coerce_to_json(&self.config);
        config.insert(
            "type".to_string(),
            Value::String(self.notification_type.clone()),
        );

        EventNotificationRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            config,
            share_request: self.share_request.clone(),
        }
    }
}

pub struct EventNotificationReconciler {
    client: ResourceClient<EventNotification>,
}

impl EventNotificationReconciler {
    pub fn new(client: &GraylogClient) -> Self {
        Self {
            client: client.event_notifications(),
        }
    }

    fn state(
        id: String,
        record: &EventNotification,
        config: ConfigMap,
        fallback_type: &str,
    ) -> EventNotificationState {
        EventNotificationState {
            id,
            title: record.title.clone(),
            description: record.description.clone(),
            notification_type: record
                .notification_type()
                .unwrap_or(fallback_type)
                .to_string(),
            config,
        }
    }
}

#[async_trait]
impl Reconciler for EventNotificationReconciler {
    type Spec = EventNotificationSpec;
    type State = EventNotificationState;

    fn kind(&self) -> ResourceKind {
        ResourceKind::EventNotification
    }

    async fn create(&self, spec: &EventNotificationSpec) -> Result<EventNotificationState> {
        let desc = self.client.descriptor();
        let outcome = self.client.create(&spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_create, "created").await?;
        tracing::info!(kind = desc.label, id = %id, "created");
        let config = track(&spec.config, &record.config);
        Ok(Self::state(id, &record, config, &spec.notification_type))
    }

    async fn read(&self, prior: &EventNotificationState) -> Result<EventNotificationState> {
        let label = self.client.descriptor().label;
        let record = self
            .client
            .get(&prior.id)
            .await
            .map_err(|e| gone(label, &prior.id, e))?;
        let config = refresh(&prior.config, &record.config);
        Ok(Self::state(
            prior.id.clone(),
            &record,
            config,
            &prior.notification_type,
        ))
    }

    async fn update(
        &self,
        id: &str,
        spec: &EventNotificationSpec,
    ) -> Result<EventNotificationState> {
        let desc = self.client.descriptor();
        let outcome = self.client.update(id, &spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_update, "updated").await?;
        tracing::info!(kind = desc.label, id = %id, "updated");
        let config = track(&spec.config, &record.config);
        Ok(Self::state(id, &record, config, &spec.notification_type))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(id).await?;
        tracing::info!(kind = self.client.descriptor().label, id, "deleted");
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<EventNotificationState> {
        let prior = EventNotificationState {
            id: id.to_string(),
            ..Default::default()
        };
        self.read(&prior).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_coerces_config() {
        let spec: EventNotificationSpec = serde_json::from_value(json!({
            "title": "Pager",
            "type": "http-notification-v1",
            "config": {"url": "https://hooks.example.com", "skip_tls_verification": "true"}
        }))
        .unwrap();
        let request = spec.to_request();
        assert_eq!(
            Value::Object(request.config),
            json!({
                "type": "http-notification-v1",
                "url": "https://hooks.example.com",
                "skip_tls_verification": true
            })
        );
    }

    #[test]
    fn test_declared_type_wins_over_config_type() {
        let spec = EventNotificationSpec {
            title: "Pager".to_string(),
            notification_type: "email-notification-v1".to_string(),
            config: DeclaredConfig::from([("type".to_string(), "ignored".to_string())]),
            ..Default::default()
        };
        assert_eq!(spec.to_request().notification_type(), "email-notification-v1");
    }
}
