//! Asynchronous note store handle.
//!
//! # Responsibility
//! - Own the single connection behind a note collection.
//! - Run every repository call off the caller's task and report each
//!   outcome independently.

pub mod note_store;
