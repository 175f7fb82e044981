//! Use-case layer between hosts and the note store.
//!
//! # Responsibility
//! - Keep UI/CLI hosts decoupled from storage and file formats.
//! - Report every action as a human-readable status message.

pub mod notes_session;
