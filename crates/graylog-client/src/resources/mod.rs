//! Per-kind CRUD over the transport.
//!
//! Every kind shares one protocol, implemented once by [`ResourceClient`]:
//!
//! - ids and requests are validated before any request is sent
//! - enveloped kinds wrap create/update bodies as `{entity, share_request?}`
//! - a create/update response carrying nothing but an id is reported as
//!   [`WriteOutcome::Unconfirmed`] so callers can fetch the full record
//! - every error is tagged with the operation and its target

mod event_definition;
mod event_notification;
mod index_set;
mod input;

use std::marker::PhantomData;

use graylog_core::{GraylogError, Result, validate_id};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::kind::{KindDescriptor, ResourceKind};
use crate::transport::{GraylogClient, Method, decode};

pub use event_definition::{
    EventDefinition, EventDefinitionRequest, NotificationRef, NotificationSettings,
};
pub use event_notification::{EventNotification, EventNotificationRequest};
pub use index_set::{
    DATA_TIERING_HOT_ONLY, DEFAULT_FIELD_TYPE_REFRESH_INTERVAL, DEFAULT_INDEX_ANALYZER,
    DEFAULT_MAX_NUM_SEGMENTS, DEFAULT_REPLICAS, DEFAULT_SHARDS, IndexSet, IndexSetRequest, IndexSetUpdateRequest,
    RETENTION_STRATEGY_CLASS, RETENTION_STRATEGY_CONFIG, ROTATION_STRATEGY_CLASS,
    ROTATION_STRATEGY_CONFIG, default_data_tiering, default_retention_strategy,
    default_rotation_strategy,
};
pub use input::{Input, InputRequest};

/// A record type the remote service stores under one collection.
pub trait RemoteResource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    type CreateRequest: WriteRequest;
    type UpdateRequest: WriteRequest;

    fn id(&self) -> Option<&str>;
    fn title(&self) -> &str;

    fn descriptor() -> &'static KindDescriptor {
        Self::KIND.descriptor()
    }
}

/// A create or update body.
pub trait WriteRequest: Serialize + Send + Sync {
    /// Reject requests missing required fields. Runs before any I/O.
    fn validate(&self) -> Result<()>;

    fn share_request(&self) -> Option<&ShareRequest> {
        None
    }
}

/// Grants applied to a newly written entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub selected_grantee_capabilities: IndexMap<String, String>,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    entity: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_request: Option<&'a ShareRequest>,
}

/// One page of a collection. The API returns every record in a single page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<R> {
    pub total: u64,
    pub items: Vec<R>,
}

/// Result of a create or update call.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<R> {
    /// The response carried the full record.
    Complete(R),
    /// The write succeeded but the response only identified the record.
    Unconfirmed { id: String },
}

impl<R: RemoteResource> WriteOutcome<R> {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Complete(record) => record.id(),
            Self::Unconfirmed { id } => Some(id),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn into_record(self) -> Option<R> {
        match self {
            Self::Complete(record) => Some(record),
            Self::Unconfirmed { .. } => None,
        }
    }
}

/// CRUD client for one resource kind.
pub struct ResourceClient<R> {
    client: GraylogClient,
    _kind: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: RemoteResource> ResourceClient<R> {
    pub fn new(client: GraylogClient) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &'static KindDescriptor {
        R::descriptor()
    }

    pub async fn get(&self, id: &str) -> Result<R> {
        let desc = R::descriptor();
        validate_id(desc.label, id)?;
        self.client
            .get(&desc.item_path(id))
            .await
            .map_err(|e| e.during(format!("get {}", desc.label), id))
    }

    pub async fn list(&self) -> Result<ListResponse<R>> {
        let desc = R::descriptor();
        self.fetch_all()
            .await
            .map_err(|e| e.during("list", desc.plural()))
    }

    /// Records whose title equals `title` exactly. No match is not an error.
    pub async fn search(&self, title: &str) -> Result<Vec<R>> {
        let desc = R::descriptor();
        let all = self
            .fetch_all()
            .await
            .map_err(|e| e.during(format!("search {}", desc.plural()), format!("titled '{title}'")))?;
        Ok(all.items.into_iter().filter(|r| r.title() == title).collect())
    }

    pub async fn create(&self, request: &R::CreateRequest) -> Result<WriteOutcome<R>> {
        let desc = R::descriptor();
        request.validate()?;
        let response = self
            .write(Method::Post, desc.collection, request)
            .await
            .map_err(|e| e.during(format!("create {}", desc.label), describe(request)))?;
        interpret(response, None).map_err(|e| e.during(format!("create {}", desc.label), describe(request)))
    }

    pub async fn update(&self, id: &str, request: &R::UpdateRequest) -> Result<WriteOutcome<R>> {
        let desc = R::descriptor();
        validate_id(desc.label, id)?;
        request.validate()?;
        let response = self
            .write(Method::Put, &desc.item_path(id), request)
            .await
            .map_err(|e| e.during(format!("update {}", desc.label), id))?;
        interpret(response, Some(id)).map_err(|e| e.during(format!("update {}", desc.label), id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let desc = R::descriptor();
        validate_id(desc.label, id)?;
        self.client
            .delete(&desc.item_path(id))
            .await
            .map_err(|e| e.during(format!("delete {}", desc.label), id))
    }

    async fn fetch_all(&self) -> Result<ListResponse<R>> {
        let desc = R::descriptor();
        let value: Value = self.client.get(desc.collection).await?;
        let total = value.get("total").and_then(Value::as_u64);
        let items: Vec<R> = match value.get(desc.list_field) {
            Some(Value::Null) | None => Vec::new(),
            Some(items) => decode(items.clone())?,
        };
        Ok(ListResponse {
            total: total.unwrap_or(items.len() as u64),
            items,
        })
    }

    async fn write<B: WriteRequest>(&self, method: Method, path: &str, request: &B) -> Result<Value> {
        if R::descriptor().enveloped {
            let envelope = Envelope {
                entity: request,
                share_request: request.share_request(),
            };
            self.client.call(method, path, Some(&envelope)).await
        } else {
            self.client.call(method, path, Some(request)).await
        }
    }
}

impl GraylogClient {
    pub fn event_definitions(&self) -> ResourceClient<EventDefinition> {
        ResourceClient::new(self.clone())
    }

    pub fn event_notifications(&self) -> ResourceClient<EventNotification> {
        ResourceClient::new(self.clone())
    }

    pub fn index_sets(&self) -> ResourceClient<IndexSet> {
        ResourceClient::new(self.clone())
    }

    pub fn inputs(&self) -> ResourceClient<Input> {
        ResourceClient::new(self.clone())
    }
}

/// Target used in error context for a create: its title, if it serializes one.
fn describe<B: Serialize>(request: &B) -> String {
    serde_json::to_value(request)
        .ok()
        .and_then(|v| v.get("title").and_then(Value::as_str).map(|t| format!("'{t}'")))
        .unwrap_or_default()
}

/// Classify a write response.
///
/// `known_id` is the id the caller already holds (updates); an empty body is
/// then accepted as an unconfirmed write of that record.
fn interpret<R: RemoteResource>(response: Value, known_id: Option<&str>) -> Result<WriteOutcome<R>> {
    let label = R::descriptor().label;
    let missing_id = || {
        GraylogError::transport(
            "failed to decode response",
            format!("{label} write did not return an ID"),
        )
    };

    match response {
        Value::Null => known_id
            .map(|id| WriteOutcome::Unconfirmed { id: id.to_string() })
            .ok_or_else(missing_id),
        Value::Object(ref map) if map.keys().all(|k| k == "id") => {
            let id = map
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .or(known_id)
                .ok_or_else(missing_id)?;
            Ok(WriteOutcome::Unconfirmed { id: id.to_string() })
        }
        other => {
            let record: R = decode(other)?;
            match (record.id(), known_id) {
                (Some(_), _) => Ok(WriteOutcome::Complete(record)),
                (None, Some(id)) => Ok(WriteOutcome::Unconfirmed { id: id.to_string() }),
                (None, None) => Err(missing_id()),
            }
        }
    }
}

/// Deserialize `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_only_response_is_unconfirmed() {
        let outcome: WriteOutcome<Input> = interpret(json!({"id": "abc"}), None).unwrap();
        assert_eq!(outcome, WriteOutcome::Unconfirmed { id: "abc".to_string() });
        assert!(!outcome.is_confirmed());
    }

    #[test]
    fn test_full_response_is_complete() {
        let outcome: WriteOutcome<EventNotification> = interpret(
            json!({"id": "n1", "title": "Slack", "config": {"type": "slack-notification-v1"}}),
            None,
        )
        .unwrap();
        assert!(outcome.is_confirmed());
        assert_eq!(outcome.id(), Some("n1"));
    }

    #[test]
    fn test_empty_update_response_uses_known_id() {
        let outcome: WriteOutcome<IndexSet> = interpret(Value::Null, Some("is1")).unwrap();
        assert_eq!(outcome, WriteOutcome::Unconfirmed { id: "is1".to_string() });
    }

    #[test]
    fn test_create_without_id_fails() {
        let err = interpret::<Input>(json!({}), None).unwrap_err();
        assert!(err.to_string().contains("input write did not return an ID"), "{err}");
        let err = interpret::<Input>(Value::Null, None).unwrap_err();
        assert_eq!(err.category(), graylog_core::ErrorCategory::Transport);
    }

    #[test]
    fn test_envelope_shape() {
        let request = EventNotificationRequest {
            title: "Slack".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(Envelope {
            entity: &request,
            share_request: None,
        })
        .unwrap();
        assert!(body.get("entity").is_some());
        assert!(body.get("share_request").is_none());
    }
}
