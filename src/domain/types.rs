//! Identifier value types and resource kinds shared across layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Identity of the user that owns a record.
///
/// Constructed once at the request boundary and passed explicitly into every
/// read and write so ownership is always part of the query predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Canonical rendering used inside cache keys: 32 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        self.0.simple().to_string()
    }
}

impl FromStr for OwnerId {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|err| DomainError::validation(format!("invalid owner id `{raw}`: {err}")))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Primary-store identifier of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a caller-supplied identifier, rejecting anything that is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        raw.parse()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.simple().to_string()
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|err| DomainError::validation(format!("invalid record id `{raw}`: {err}")))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The owner-scoped resource families served through the read-through layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Events,
    Functions,
}

impl ResourceKind {
    /// Collection name; also the list cache-key namespace and JSON field.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Events => "events",
            ResourceKind::Functions => "functions",
        }
    }

    /// Single-record name; also the item cache-key namespace and JSON field.
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Events => "event",
            ResourceKind::Functions => "function",
        }
    }

    pub fn list_message(&self) -> &'static str {
        match self {
            ResourceKind::Events => "All events are here",
            ResourceKind::Functions => "All functions are here",
        }
    }

    pub fn item_message(&self) -> &'static str {
        match self {
            ResourceKind::Events => "One event fetched successfully",
            ResourceKind::Functions => "One function fetched successfully",
        }
    }

    pub fn created_message(&self) -> &'static str {
        match self {
            ResourceKind::Events => "New event created",
            ResourceKind::Functions => "New function created",
        }
    }

    pub fn updated_message(&self) -> &'static str {
        match self {
            ResourceKind::Events => "Event updated successfully",
            ResourceKind::Functions => "Function updated successfully",
        }
    }

    pub fn deleted_message(&self) -> &'static str {
        match self {
            ResourceKind::Events => "One event is deleted",
            ResourceKind::Functions => "One function is deleted",
        }
    }

    pub fn deleted_all_message(&self) -> &'static str {
        match self {
            ResourceKind::Events => "All events deleted",
            ResourceKind::Functions => "All functions deleted",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_non_uuid_input() {
        let err = RecordId::parse("not-an-id").expect_err("malformed id rejected");
        assert!(matches!(err, DomainError::Validation { .. }));

        // 24-char hex ids from document stores are not accepted either.
        assert!(RecordId::parse("64b7f0c2a1b2c3d4e5f60718").is_err());
    }

    #[test]
    fn hex_rendering_is_case_insensitive_to_input() {
        let lower = RecordId::parse("6f9619ff-8b86-d011-b42d-00cf4fc964ff").expect("lower");
        let upper = RecordId::parse("6F9619FF-8B86-D011-B42D-00CF4FC964FF").expect("upper");
        let simple = RecordId::parse("6f9619ff8b86d011b42d00cf4fc964ff").expect("simple");

        assert_eq!(lower.to_hex(), "6f9619ff8b86d011b42d00cf4fc964ff");
        assert_eq!(lower.to_hex(), upper.to_hex());
        assert_eq!(lower, simple);
    }

    #[test]
    fn owner_id_trims_header_whitespace() {
        let owner: OwnerId = " 6f9619ff-8b86-d011-b42d-00cf4fc964ff "
            .parse()
            .expect("owner parsed");
        assert_eq!(owner.to_hex(), "6f9619ff8b86d011b42d00cf4fc964ff");
    }

    #[test]
    fn resource_names_do_not_share_namespaces() {
        for kind in [ResourceKind::Events, ResourceKind::Functions] {
            assert_ne!(kind.plural(), kind.singular());
        }
        assert_ne!(
            ResourceKind::Events.plural(),
            ResourceKind::Functions.plural()
        );
    }
}
