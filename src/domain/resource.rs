//! Binds each owner-scoped record type to its resource kind and draft type.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::entities::{EventDraft, EventRecord, FunctionDraft, FunctionRecord};
use crate::domain::types::{OwnerId, RecordId, ResourceKind};

pub trait OwnedResource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Fields accepted on create and update.
    type Draft: DeserializeOwned + Clone + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn record_id(&self) -> RecordId;

    fn owner(&self) -> OwnerId;
}

impl OwnedResource for EventRecord {
    type Draft = EventDraft;

    const KIND: ResourceKind = ResourceKind::Events;

    fn record_id(&self) -> RecordId {
        RecordId::new(self.id)
    }

    fn owner(&self) -> OwnerId {
        OwnerId::new(self.user_id)
    }
}

impl OwnedResource for FunctionRecord {
    type Draft = FunctionDraft;

    const KIND: ResourceKind = ResourceKind::Functions;

    fn record_id(&self) -> RecordId {
        RecordId::new(self.id)
    }

    fn owner(&self) -> OwnerId {
        OwnerId::new(self.user_id)
    }
}
