//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the mempool overlay are abstracted behind traits.
//! This crate provides test-friendly implementations that return deterministic
//! values, can be controlled programmatically and never touch the filesystem.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod store;

pub use store::NullNameStore;
