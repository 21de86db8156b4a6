use async_trait::async_trait;
use graylog_client::kind::backfill;
use graylog_client::{
    EventDefinition, EventDefinitionRequest, GraylogClient, NotificationSettings, RemoteResource,
    ResourceClient, ResourceKind, ShareRequest,
};
use graylog_core::{ConfigMap, DeclaredConfig, Result, coerce_to_json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reconciler::{Reconciler, gone, refresh, settle, track};

/// Declared event definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDefinitionSpec {
    pub title: String,
    pub description: String,
    pub priority: i64,
    /// Event processor type, e.g. `aggregation-v1`. Sent as `config.type`.
    pub config_type: String,
    pub config: DeclaredConfig,
    pub grace_period_ms: Option<i64>,
    pub backlog_size: Option<i64>,
    pub notification_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_request: Option<ShareRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDefinitionState {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub config_type: String,
    #[serde(default)]
    pub config: ConfigMap,
    #[serde(default)]
    pub grace_period_ms: i64,
    #[serde(default)]
    pub backlog_size: i64,
    #[serde(default)]
    pub notification_ids: Vec<String>,
}

impl EventDefinitionSpec {
    /// Build the entity: declared config coerced, `type` set from `config_type`, then the
    /// fields the processor type cannot run without.
    pub fn to_request(&self) -> EventDefinitionRequest {
        let mut config = coerce_to_json(&self.config);
        config.insert("type".to_string(), Value::String(self.config_type.clone()));

        let defaults = (EventDefinition::descriptor().config_defaults)(&self.config_type);
        let filled = backfill(&mut config, defaults);
        if !filled.is_empty() {
            tracing::warn!(
                title = %self.title,
                config_type = %self.config_type,
                fields = ?filled,
                "defaulted event definition config fields"
            );
        }

        EventDefinitionRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            config,
            notification_settings: NotificationSettings {
                grace_period_ms: self.grace_period_ms.unwrap_or(0),
                backlog_size: self.backlog_size.unwrap_or(0),
            },
            share_request: self.share_request.clone(),
            ..Default::default()
        }
        .with_notifications(self.notification_ids.iter().cloned())
    }
}

pub struct EventDefinitionReconciler {
    client: ResourceClient<EventDefinition>,
}

impl EventDefinitionReconciler {
    pub fn new(client: &GraylogClient) -> Self {
        Self {
            client: client.event_definitions(),
        }
    }

    fn state(
        id: String,
        record: &EventDefinition,
        config: ConfigMap,
        fallback_type: &str,
    ) -> EventDefinitionState {
        EventDefinitionState {
            id,
            title: record.title.clone(),
            description: record.description.clone(),
            priority: record.priority,
            config_type: record.config_type().unwrap_or(fallback_type).to_string(),
            config,
            grace_period_ms: record.notification_settings.grace_period_ms,
            backlog_size: record.notification_settings.backlog_size,
            notification_ids: record.notification_ids(),
        }
    }
}

#[async_trait]
impl Reconciler for EventDefinitionReconciler {
    type Spec = EventDefinitionSpec;
    type State = EventDefinitionState;

    fn kind(&self) -> ResourceKind {
        ResourceKind::EventDefinition
    }

    async fn create(&self, spec: &EventDefinitionSpec) -> Result<EventDefinitionState> {
        let desc = self.client.descriptor();
        let outcome = self.client.create(&spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_create, "created").await?;
        tracing::info!(kind = desc.label, id = %id, "created");
        let config = track(&spec.config, &record.config);
        Ok(Self::state(id, &record, config, &spec.config_type))
    }

    async fn read(&self, prior: &EventDefinitionState) -> Result<EventDefinitionState> {
        let label = self.client.descriptor().label;
        let record = self
            .client
            .get(&prior.id)
            .await
            .map_err(|e| gone(label, &prior.id, e))?;
        let config = refresh(&prior.config, &record.config);
        Ok(Self::state(prior.id.clone(), &record, config, &prior.config_type))
    }

    async fn update(&self, id: &str, spec: &EventDefinitionSpec) -> Result<EventDefinitionState> {
        let desc = self.client.descriptor();
        let outcome = self.client.update(id, &spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_update, "updated").await?;
        tracing::info!(kind = desc.label, id = %id, "updated");
        let config = track(&spec.config, &record.config);
        Ok(Self::state(id, &record, config, &spec.config_type))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(id).await?;
        tracing::info!(kind = self.client.descriptor().label, id, "deleted");
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<EventDefinitionState> {
        let prior = EventDefinitionState {
            id: id.to_string(),
            ..Default::default()
        };
        self.read(&prior).await
    }
}
