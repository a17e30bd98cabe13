//! Use-case services over repository contracts.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Services stay storage-agnostic.

pub mod client_service;
