//! Read-only resolution of existing records by id or by title.

use graylog_client::{EventDefinition, EventNotification, GraylogClient, Lookup, RemoteResource};
use graylog_core::{GraylogTimestamp, Result};
use serde::{Deserialize, Serialize};

/// What a lookup of an event definition exposes.
///
/// `alert`, `state` and the two timestamps are computed by Graylog. Zero
/// timestamps are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDefinitionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub alert: bool,
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
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventNotificationSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl From<EventDefinition> for EventDefinitionSummary {
    fn from(record: EventDefinition) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            title: record.title,
            description: record.description,
            priority: record.priority,
            alert: record.alert,
            state: record.state.filter(|s| !s.is_empty()),
            updated_at: record.updated_at.filter(|ts| !ts.is_zero()),
            matched_at: record.matched_at.filter(|ts| !ts.is_zero()),
        }
    }
}

impl From<EventNotification> for EventNotificationSummary {
    fn from(record: EventNotification) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            title: record.title,
            description: record.description,
        }
    }
}

/// Resolve an event definition by `id`, or by `title` when no id is given.
///
/// # Errors
///
/// `Validation` when neither is given, `NotFound` when nothing matches and
/// `Ambiguous` when several definitions share the title.
pub async fn event_definition(
    client: &GraylogClient,
    id: Option<String>,
    title: Option<String>,
) -> Result<EventDefinitionSummary> {
    let lookup = Lookup::from_parts(EventDefinition::descriptor().label, id, title)?;
    let record = client.event_definitions().lookup(&lookup).await?;
    Ok(record.into())
}

/// Resolve an event notification by `id`, or by `title` when no id is given.
pub async fn event_notification(
    client: &GraylogClient,
    id: Option<String>,
    title: Option<String>,
) -> Result<EventNotificationSummary> {
    let lookup = Lookup::from_parts(EventNotification::descriptor().label, id, title)?;
    let record = client.event_notifications().lookup(&lookup).await?;
    Ok(record.into())
}
