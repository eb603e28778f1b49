//! Remote document store: REST client and live subscription.

pub mod client;
pub mod store;

pub use client::RemoteEntryClient;
pub use store::{RemoteEntryStore, SnapshotHandler, SnapshotSource};
