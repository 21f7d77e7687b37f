//! Asset Sync Core - domain entities, configuration and the two-way reconciler.
//!
//! This crate is database-agnostic. It defines the [`sync::SyncStore`] contract
//! that storage adapters implement, and the pull/push reconcilers that merge
//! assets and their attachments between a local store and a remote one.

pub mod assets;
pub mod config;
pub mod errors;
pub mod sync;
pub mod utils;

pub use assets::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
