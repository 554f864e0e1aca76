//! JSON encoding for the account file.
//!
//! Output is pretty-printed with 2-space indentation and a trailing
//! newline, so the stored record stays stable between writes.

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable_bytes};
