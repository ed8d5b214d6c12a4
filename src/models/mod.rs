//! Data models shared across services and routes.

pub mod scan;
