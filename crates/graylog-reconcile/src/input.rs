use async_trait::async_trait;
use graylog_client::{GraylogClient, Input, InputRequest, ResourceClient, ResourceKind};
use graylog_core::{ConfigMap, DeclaredConfig, Result, coerce_to_json};
use serde::{Deserialize, Serialize};

use crate::reconciler::{Reconciler, gone, refresh, settle, track};

/// Declared input. Non-global inputs run on `node`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub configuration: DeclaredConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub configuration: ConfigMap,
}

impl InputSpec {
    pub fn to_request(&self) -> InputRequest {
        InputRequest {
            title: self.title.clone(),
            input_type: self.input_type.clone(),
            global: self.global,
            configuration: coerce_to_json(&self.configuration),
            node: self.node.clone().filter(|n| !n.is_empty()),
        }
    }
}

pub struct InputReconciler {
    client: ResourceClient<Input>,
}

impl InputReconciler {
    pub fn new(client: &GraylogClient) -> Self {
        Self {
            client: client.inputs(),
        }
    }

    fn state(
        id: String,
        record: &Input,
        configuration: ConfigMap,
        known_node: Option<&String>,
    ) -> InputState {
        let node = record
            .node
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| known_node.cloned());
        InputState {
            id,
            title: record.title.clone(),
            input_type: record.input_type.clone(),
            global: record.global,
            node,
            configuration,
        }
    }
}

#[async_trait]
impl Reconciler for InputReconciler {
    type Spec = InputSpec;
    type State = InputState;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Input
    }

    async fn create(&self, spec: &InputSpec) -> Result<InputState> {
        let desc = self.client.descriptor();
        let outcome = self.client.create(&spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_create, "created").await?;
        tracing::info!(kind = desc.label, id = %id, input_type = %record.input_type, "created");
        let configuration = track(&spec.configuration, record.settings());
        Ok(Self::state(id, &record, configuration, spec.node.as_ref()))
    }

    async fn read(&self, prior: &InputState) -> Result<InputState> {
        let label = self.client.descriptor().label;
        let record = self
            .client
            .get(&prior.id)
            .await
            .map_err(|e| gone(label, &prior.id, e))?;
        let configuration = refresh(&prior.configuration, record.settings());
        Ok(Self::state(
            prior.id.clone(),
            &record,
            configuration,
            prior.node.as_ref(),
        ))
    }

    async fn update(&self, id: &str, spec: &InputSpec) -> Result<InputState> {
        let desc = self.client.descriptor();
        let outcome = self.client.update(id, &spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_update, "updated").await?;
        tracing::info!(kind = desc.label, id = %id, "updated");
        let configuration = track(&spec.configuration, record.settings());
        Ok(Self::state(id, &record, configuration, spec.node.as_ref()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(id).await?;
        tracing::info!(kind = self.client.descriptor().label, id, "deleted");
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<InputState> {
        let prior = InputState {
            id: id.to_string(),
            ..Default::default()
        };
        self.read(&prior).await
    }
}
