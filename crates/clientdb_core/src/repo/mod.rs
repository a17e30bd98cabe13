//! Repository layer for client persistence.
//!
//! # Responsibility
//! - Define the data access contract for client records.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Writes call `Client::validate()` before touching SQL.
//! - Lookups report `NotFound` as a semantic error, separate from store
//!   failures.

pub mod client_repo;
