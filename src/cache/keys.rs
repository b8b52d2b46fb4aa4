//! Cache key definitions.
//!
//! Every key embeds the owner so no two owners can ever share an entry.
//! Identifiers are rendered as 32 lowercase hex digits.

use std::fmt;

use crate::application::pagination::PageRequest;
use crate::domain::types::{OwnerId, RecordId, ResourceKind};

/// A deterministic textual cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// `"{plural}:{owner}:{page}:{limit}"`
    pub fn list(kind: ResourceKind, owner: OwnerId, page: PageRequest) -> Self {
        Self(format!(
            "{}:{}:{}:{}",
            kind.plural(),
            owner.to_hex(),
            page.page(),
            page.limit()
        ))
    }

    /// `"{singular}:{owner}:{record}"`
    pub fn item(kind: ResourceKind, owner: OwnerId, id: RecordId) -> Self {
        Self(format!(
            "{}:{}:{}",
            kind.singular(),
            owner.to_hex(),
            id.to_hex()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefix covering every cached list page of one owner.
pub fn owner_list_prefix(kind: ResourceKind, owner: OwnerId) -> String {
    format!("{}:{}:", kind.plural(), owner.to_hex())
}

/// Prefix covering every cached single record of one owner.
pub fn owner_item_prefix(kind: ResourceKind, owner: OwnerId) -> String {
    format!("{}:{}:", kind.singular(), owner.to_hex())
}
