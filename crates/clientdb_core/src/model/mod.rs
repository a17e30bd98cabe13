//! Domain model for client records.
//!
//! # Responsibility
//! - Define the flat record mapped to one row of the `clients` table.
//!
//! # Invariants
//! - Every persisted client is identified by a store-assigned `ClientId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod client;
