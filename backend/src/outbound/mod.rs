//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **randomuser**: reqwest client for the random-user generator
//! - **snapshot**: JSON file snapshot of the last complete fetch
//!
//! Adapters are thin translators between domain types and transport or
//! storage representations. They contain no business logic.

pub mod randomuser;
pub mod snapshot;
