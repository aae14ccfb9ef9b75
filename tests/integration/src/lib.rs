//! Integration test utilities for the engagement engine
//!
//! This crate provides helpers for running end-to-end scenarios through
//! the service layer against the in-memory store.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
