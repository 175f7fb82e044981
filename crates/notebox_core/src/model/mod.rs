//! Note domain model.
//!
//! # Invariants
//! - Every persisted note is identified by a store-assigned `NoteId`.
//! - Notes are immutable once stored; the only removal path is clear-all.

pub mod note;
