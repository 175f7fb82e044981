//! File interchange for note export and import.
//!
//! # Responsibility
//! - Render stored notes as the JSON export document.
//! - Parse import documents into insertion payloads.
//!
//! The store never sees malformed input: everything that fails to parse is
//! rejected here with `InterchangeError::Malformed`.

pub mod json;
