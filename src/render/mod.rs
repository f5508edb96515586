//! Output rendering for outline documents.

mod json;

pub use json::{to_json, write_json, write_json_file, JsonFormat};
