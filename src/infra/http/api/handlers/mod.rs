//! API handlers organized by surface.
//!
//! `records` serves the owner-scoped resources generically over the record
//! type; `admin` serves the unscoped administrative views.

mod admin;
mod records;

pub use admin::*;
pub use records::*;
