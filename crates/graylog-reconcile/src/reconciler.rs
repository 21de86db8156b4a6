use async_trait::async_trait;
use graylog_client::{RemoteResource, ResourceClient, ResourceKind, WriteOutcome};
use graylog_core::{ConfigMap, ConfigValue, DeclaredConfig, GraylogError, Result};
use serde_json::{Map, Value};

/// Lifecycle of one resource kind.
///
/// `Spec` is what the caller declares; `State` is what gets persisted between
/// calls. The keys of a state's extra-configuration map are the tracked
/// attribute set: [`Reconciler::read`] refreshes those keys and nothing else.
#[async_trait]
pub trait Reconciler: Send + Sync {
    type Spec: Send + Sync;
    type State: Send + Sync;

    fn kind(&self) -> ResourceKind;

    /// Create the resource and return its state, tracking the declared keys.
    ///
    /// # Errors
    ///
    /// Returns `GraylogError::Validation` before any request when a required
    /// field is empty. When the record was created but the follow-up fetch
    /// failed, the error names the created id.
    async fn create(&self, spec: &Self::Spec) -> Result<Self::State>;

    /// Refresh `prior` from the remote record.
    ///
    /// # Errors
    ///
    /// Returns `GraylogError::NotFound` naming the kind and id when the record
    /// no longer exists.
    async fn read(&self, prior: &Self::State) -> Result<Self::State>;

    /// Replace the remote record's declared fields.
    async fn update(&self, id: &str, spec: &Self::Spec) -> Result<Self::State>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Adopt an existing record known only by id. Nothing is tracked yet.
    async fn import(&self, id: &str) -> Result<Self::State>;
}

/// State config right after a write: every declared key, preferring the value
/// the server reports over the one that was sent.
pub(crate) fn track(declared: &DeclaredConfig, remote: &Map<String, Value>) -> ConfigMap {
    declared
        .iter()
        .map(|(key, raw)| {
            let value = match remote.get(key) {
                Some(observed) => ConfigValue::from_remote(observed),
                None => ConfigValue::coerce(raw),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Refresh tracked keys from the remote record. Keys it has but nobody
/// declared are ignored. A tracked key the remote no longer has is dropped,
/// but only while at least one tracked key is still present: a remote
/// configuration that is empty or shares no tracked key leaves the tracked
/// map as it was.
pub(crate) fn refresh(tracked: &ConfigMap, remote: &Map<String, Value>) -> ConfigMap {
    let refreshed: ConfigMap = tracked
        .keys()
        .filter_map(|key| {
            remote
                .get(key)
                .map(|observed| (key.clone(), ConfigValue::from_remote(observed)))
        })
        .collect();
    if refreshed.is_empty() {
        return tracked.clone();
    }
    refreshed
}

/// Turn a write outcome into a full record, fetching it when the response was
/// partial or the kind always needs confirmation.
pub(crate) async fn settle<R: RemoteResource>(
    client: &ResourceClient<R>,
    outcome: WriteOutcome<R>,
    always_confirm: bool,
    action: &str,
) -> Result<(String, R)> {
    let label = R::descriptor().label;
    let id = outcome.id().map(str::to_string).ok_or_else(|| {
        GraylogError::transport(
            "failed to decode response",
            format!("{label} write did not return an ID"),
        )
    })?;

    match outcome {
        WriteOutcome::Complete(record) if !always_confirm => Ok((id, record)),
        outcome => {
            if outcome.is_confirmed() {
                tracing::debug!(kind = label, id = %id, "fetching {action} record");
            } else {
                tracing::warn!(
                    kind = label,
                    id = %id,
                    "{action} response carried only an id; fetching record"
                );
            }
            let record = client
                .get(&id)
                .await
                .map_err(|e| e.during(format!("confirm {action} {label}"), id.as_str()))?;
            Ok((id, record))
        }
    }
}

/// Map a failed read of `id` to `NotFound` when the record is gone.
pub(crate) fn gone(label: &str, id: &str, err: GraylogError) -> GraylogError {
    if err.is_not_found() {
        GraylogError::not_found(label, "id", id)
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declared(pairs: &[(&str, &str)]) -> DeclaredConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn remote(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_track_prefers_remote_values() {
        let config = track(
            &declared(&[("port", "514"), ("bind_address", "0.0.0.0"), ("tls", "false")]),
            &remote(json!({"port": 1514, "recv_buffer_size": 262144})),
        );
        assert_eq!(config["port"], ConfigValue::Int(1514));
        assert_eq!(config["bind_address"], ConfigValue::String("0.0.0.0".into()));
        assert_eq!(config["tls"], ConfigValue::Bool(false));
        assert!(!config.contains_key("recv_buffer_size"));
    }

    #[test]
    fn test_refresh_never_adds_keys() {
        let tracked = track(&declared(&[("port", "514"), ("old", "x")]), &Map::new());
        let refreshed = refresh(
            &tracked,
            &remote(json!({"port": 514, "extra": true, "another": "y"})),
        );
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed["port"], ConfigValue::Int(514));
    }

    #[test]
    fn test_refresh_keeps_tracked_keys_when_remote_is_empty() {
        let tracked = track(&declared(&[("url", "https://x"), ("retries", "3")]), &Map::new());
        assert_eq!(refresh(&tracked, &Map::new()), tracked);
    }

    #[test]
    fn test_refresh_keeps_tracked_keys_when_none_overlap() {
        let tracked = track(&declared(&[("url", "https://x")]), &Map::new());
        let refreshed = refresh(&tracked, &remote(json!({"type": "http-notification-v1"})));
        assert_eq!(refreshed, tracked);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let remote = remote(json!({"port": 514, "bind_address": "0.0.0.0"}));
        let tracked = track(&declared(&[("port", "514"), ("bind_address", "x")]), &remote);
        let once = refresh(&tracked, &remote);
        let twice = refresh(&once, &remote);
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn test_gone_maps_404() {
        let err = gone("input", "in1", GraylogError::api(404, "").during("get input", "in1"));
        assert_eq!(err.to_string(), "No input found with id: in1");

        let err = gone("input", "in1", GraylogError::api(500, "boom"));
        assert_eq!(err.status(), Some(500));
    }
}
