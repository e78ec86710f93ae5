//! HTTP inbound adapter exposing REST endpoints.

pub mod health;
pub mod state;
pub mod users;
