//! Authentication module
//!
//! Supports: Tastypie API Key, Bearer, Custom Headers, and any closure
//!
//! An auth hook is handed every outgoing request right before it is
//! dispatched and returns it, usually with credentials attached to its
//! headers. The broker never needs to know which flavor it is talking to.

mod hooks;
mod types;

pub use hooks::{ApiKeyAuth, AuthHook, BearerAuth, HeaderAuth, SharedAuth};
pub use types::AuthConfig;

#[cfg(test)]
mod tests;
