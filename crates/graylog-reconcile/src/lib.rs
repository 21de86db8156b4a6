//! Reconciliation of declared Graylog resources against their remote state.
//!
//! Each resource kind has a [`Reconciler`] that turns a caller's declared
//! spec into API requests and maps the remote record back into a state value.
//! Only the extra-configuration keys the caller declared are tracked, so
//! server-side defaults never show up as drift.

pub mod event_definition;
pub mod event_notification;
pub mod index_set;
pub mod input;
pub mod lookup;
mod reconciler;

pub use event_definition::{EventDefinitionReconciler, EventDefinitionSpec, EventDefinitionState};
pub use event_notification::{
    EventNotificationReconciler, EventNotificationSpec, EventNotificationState,
};
pub use index_set::{IndexSetReconciler, IndexSetSpec, IndexSetState};
pub use input::{InputReconciler, InputSpec, InputState};
pub use lookup::{EventDefinitionSummary, EventNotificationSummary};
pub use reconciler::Reconciler;
