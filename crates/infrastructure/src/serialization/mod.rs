//! JSON serialization for files the client writes.

mod json;

pub use json::*;
