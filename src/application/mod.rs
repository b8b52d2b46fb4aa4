//! Application services: pagination, envelopes, record and admin services.

pub mod admin;
pub mod envelope;
pub mod error;
pub mod pagination;
pub mod records;
pub mod repos;
