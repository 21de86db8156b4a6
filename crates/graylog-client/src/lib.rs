//! Client side of Graylog reconciliation.
//!
//! [`GraylogClient`] signs and sends single requests against
//! `<endpoint>/api/<path>`. [`ResourceClient`] layers the per-kind CRUD
//! protocol on top of it: validation before any I/O, entity envelopes for the
//! kinds that need them, and detection of create/update responses that only
//! carry an id.

pub mod config;
pub mod kind;
pub mod lookup;
pub mod resources;
pub mod transport;

pub use config::{ClientConfig, ClientSettings};
pub use kind::{KindDescriptor, ResourceKind};
pub use lookup::{single_by_title, Lookup};
pub use resources::{
    EventDefinition, EventDefinitionRequest, EventNotification, EventNotificationRequest,
    IndexSet, IndexSetRequest, IndexSetUpdateRequest, Input, InputRequest, ListResponse,
    NotificationRef, NotificationSettings, RemoteResource, ResourceClient, ShareRequest,
    WriteOutcome, WriteRequest,
};
pub use transport::{GraylogClient, Method};
