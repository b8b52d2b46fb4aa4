//! Response envelopes returned by the read and write services.
//!
//! The JSON field that carries the payload is named after the resource
//! (`events`, `function`, ...), so the envelopes serialize themselves as maps
//! rather than deriving a fixed shape.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::application::pagination::PageResult;
use crate::domain::resource::OwnedResource;

/// Which path produced a payload. Never stored inside a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    Primary,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Primary => "primary",
        }
    }
}

/// A value tagged with the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn cache(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    pub fn primary(value: T) -> Self {
        Self {
            value,
            source: Source::Primary,
        }
    }
}

/// `{msg, <plural>: [...], page, limit, total, hasNext, hasPrev, source}`
#[derive(Debug, Clone)]
pub struct ListEnvelope<T> {
    pub message: &'static str,
    pub field: &'static str,
    pub page: PageResult<T>,
    pub source: Source,
}

impl<R: OwnedResource> ListEnvelope<R> {
    pub fn for_resource(sourced: Sourced<PageResult<R>>) -> Self {
        Self {
            message: R::KIND.list_message(),
            field: R::KIND.plural(),
            page: sourced.value,
            source: sourced.source,
        }
    }
}

impl<T: Serialize> Serialize for ListEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("msg", self.message)?;
        map.serialize_entry(self.field, &self.page.items)?;
        map.serialize_entry("page", &self.page.page)?;
        map.serialize_entry("limit", &self.page.limit)?;
        map.serialize_entry("total", &self.page.total)?;
        map.serialize_entry("hasNext", &self.page.has_next)?;
        map.serialize_entry("hasPrev", &self.page.has_prev)?;
        map.serialize_entry("source", &self.source)?;
        map.end()
    }
}

/// `{msg, <singular>: {...}, source}`
#[derive(Debug, Clone)]
pub struct ItemEnvelope<T> {
    pub message: &'static str,
    pub field: &'static str,
    pub record: T,
    pub source: Source,
}

impl<R: OwnedResource> ItemEnvelope<R> {
    pub fn for_resource(sourced: Sourced<R>) -> Self {
        Self {
            message: R::KIND.item_message(),
            field: R::KIND.singular(),
            record: sourced.value,
            source: sourced.source,
        }
    }
}

impl<T: Serialize> Serialize for ItemEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("msg", self.message)?;
        map.serialize_entry(self.field, &self.record)?;
        map.serialize_entry("source", &self.source)?;
        map.end()
    }
}

/// `{msg, <field>: body}` for uncached responses (writes, admin views).
#[derive(Debug, Clone)]
pub struct MessageEnvelope<T> {
    pub message: &'static str,
    pub field: &'static str,
    pub body: T,
}

impl<T> MessageEnvelope<T> {
    pub fn new(message: &'static str, field: &'static str, body: T) -> Self {
        Self {
            message,
            field,
            body,
        }
    }
}

impl<T: Serialize> Serialize for MessageEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("msg", self.message)?;
        map.serialize_entry(self.field, &self.body)?;
        map.end()
    }
}
