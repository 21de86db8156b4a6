use async_trait::async_trait;
use graylog_client::resources::{
    DEFAULT_FIELD_TYPE_REFRESH_INTERVAL, DEFAULT_INDEX_ANALYZER, DEFAULT_MAX_NUM_SEGMENTS,
    DEFAULT_REPLICAS, DEFAULT_SHARDS, RETENTION_STRATEGY_CLASS, ROTATION_STRATEGY_CLASS,
    default_retention_strategy, default_rotation_strategy,
};
use graylog_client::{GraylogClient, IndexSet, IndexSetRequest, ResourceClient, ResourceKind};
use graylog_core::{ConfigMap, DeclaredConfig, GraylogTimestamp, Result, coerce_to_json};
use serde::{Deserialize, Serialize};

use crate::reconciler::{Reconciler, gone, refresh, settle, track};

/// Declared index set.
///
/// Unset fields take Graylog's usual defaults. The declared strategy maps are
/// overlaid on the default strategy configs, and only their keys are tracked.
/// `index_prefix` and `writable` are fixed at create; updates do not send them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSetSpec {
    pub title: String,
    pub description: String,
    pub index_prefix: String,
    pub shards: i64,
    pub replicas: i64,
    pub rotation_strategy_class: String,
    pub rotation_strategy: DeclaredConfig,
    pub retention_strategy_class: String,
    pub retention_strategy: DeclaredConfig,
    pub index_analyzer: String,
    pub index_optimization_max_num_segments: i64,
    pub index_optimization_disabled: bool,
    pub field_type_refresh_interval: i64,
    pub writable: bool,
}

impl Default for IndexSetSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            index_prefix: String::new(),
            shards: DEFAULT_SHARDS,
            replicas: DEFAULT_REPLICAS,
            rotation_strategy_class: ROTATION_STRATEGY_CLASS.to_string(),
            rotation_strategy: DeclaredConfig::new(),
            retention_strategy_class: RETENTION_STRATEGY_CLASS.to_string(),
            retention_strategy: DeclaredConfig::new(),
            index_analyzer: DEFAULT_INDEX_ANALYZER.to_string(),
            index_optimization_max_num_segments: DEFAULT_MAX_NUM_SEGMENTS,
            index_optimization_disabled: false,
            field_type_refresh_interval: DEFAULT_FIELD_TYPE_REFRESH_INTERVAL,
            writable: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSetState {
    pub id: String,
    pub title: String,
    pub description: String,
    pub index_prefix: String,
    pub shards: i64,
    pub replicas: i64,
    pub rotation_strategy_class: String,
    pub rotation_strategy: ConfigMap,
    pub retention_strategy_class: String,
    pub retention_strategy: ConfigMap,
    pub index_analyzer: String,
    pub index_optimization_max_num_segments: i64,
    pub index_optimization_disabled: bool,
    pub field_type_refresh_interval: i64,
    pub writable: bool,
    #[serde(rename = "default")]
    pub is_default: bool,
    #[serde(
        with = "graylog_core::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<GraylogTimestamp>,
}

impl IndexSetSpec {
    pub fn to_request(&self) -> IndexSetRequest {
        let mut rotation_strategy = default_rotation_strategy();
        rotation_strategy.extend(coerce_to_json(&self.rotation_strategy));
        let mut retention_strategy = default_retention_strategy();
        retention_strategy.extend(coerce_to_json(&self.retention_strategy));

        IndexSetRequest {
            description: self.description.clone(),
            shards: self.shards,
            replicas: self.replicas,
            rotation_strategy_class: self.rotation_strategy_class.clone(),
            rotation_strategy,
            retention_strategy_class: self.retention_strategy_class.clone(),
            retention_strategy,
            index_analyzer: self.index_analyzer.clone(),
            index_optimization_max_num_segments: self.index_optimization_max_num_segments,
            index_optimization_disabled: self.index_optimization_disabled,
            field_type_refresh_interval: self.field_type_refresh_interval,
            writable: self.writable,
            ..IndexSetRequest::new(self.title.clone(), self.index_prefix.clone())
        }
    }
}

pub struct IndexSetReconciler {
    client: ResourceClient<IndexSet>,
}

impl IndexSetReconciler {
    pub fn new(client: &GraylogClient) -> Self {
        Self {
            client: client.index_sets(),
        }
    }

    fn state(
        id: String,
        record: &IndexSet,
        rotation_strategy: ConfigMap,
        retention_strategy: ConfigMap,
    ) -> IndexSetState {
        IndexSetState {
            id,
            title: record.title.clone(),
            description: record.description.clone(),
            index_prefix: record.index_prefix.clone(),
            shards: record.shards,
            replicas: record.replicas,
            rotation_strategy_class: record.rotation_strategy_class.clone(),
            rotation_strategy,
            retention_strategy_class: record.retention_strategy_class.clone(),
            retention_strategy,
            index_analyzer: record.index_analyzer.clone(),
            index_optimization_max_num_segments: record.index_optimization_max_num_segments,
            index_optimization_disabled: record.index_optimization_disabled,
            field_type_refresh_interval: record.field_type_refresh_interval,
            writable: record.writable,
            is_default: record.is_default,
            creation_date: record.creation_date.clone(),
        }
    }

    fn tracked(spec: &IndexSetSpec, id: String, record: &IndexSet) -> IndexSetState {
        Self::state(
            id,
            record,
            track(&spec.rotation_strategy, &record.rotation_strategy),
            track(&spec.retention_strategy, &record.retention_strategy),
        )
    }
}

#[async_trait]
impl Reconciler for IndexSetReconciler {
    type Spec = IndexSetSpec;
    type State = IndexSetState;

    fn kind(&self) -> ResourceKind {
        ResourceKind::IndexSet
    }

    async fn create(&self, spec: &IndexSetSpec) -> Result<IndexSetState> {
        let desc = self.client.descriptor();
        let outcome = self.client.create(&spec.to_request()).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_create, "created").await?;
        tracing::info!(kind = desc.label, id = %id, prefix = %record.index_prefix, "created");
        Ok(Self::tracked(spec, id, &record))
    }

    async fn read(&self, prior: &IndexSetState) -> Result<IndexSetState> {
        let label = self.client.descriptor().label;
        let record = self
            .client
            .get(&prior.id)
            .await
            .map_err(|e| gone(label, &prior.id, e))?;
        Ok(Self::state(
            prior.id.clone(),
            &record,
            refresh(&prior.rotation_strategy, &record.rotation_strategy),
            refresh(&prior.retention_strategy, &record.retention_strategy),
        ))
    }

    async fn update(&self, id: &str, spec: &IndexSetSpec) -> Result<IndexSetState> {
        let desc = self.client.descriptor();
        let request = spec.to_request().to_update();
        let outcome = self.client.update(id, &request).await?;
        let (id, record) = settle(&self.client, outcome, desc.confirm_after_update, "updated").await?;
        tracing::info!(kind = desc.label, id = %id, "updated");
        Ok(Self::tracked(spec, id, &record))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(id).await?;
        tracing::info!(kind = self.client.descriptor().label, id, "deleted");
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<IndexSetState> {
        let prior = IndexSetState {
            id: id.to_string(),
            ..Default::default()
        };
        self.read(&prior).await
    }
}
