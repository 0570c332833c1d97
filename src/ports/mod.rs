//! Port traits: the seams between domain and adapters.

pub mod config_port;
pub mod store_port;
