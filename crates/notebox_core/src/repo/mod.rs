//! Repository layer over the notes table.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Expose one synchronous transaction per operation; async scheduling is
//!   the store's concern.

pub mod note_repo;
