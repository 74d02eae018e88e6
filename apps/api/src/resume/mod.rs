//! Resume field extraction.
//!
//! Pure and synchronous: text in, [`ExtractedFields`] out. Async callers run
//! this on the blocking pool.

pub mod experience;
pub mod fields;
pub mod rules;
pub mod segments;
pub mod skills;
pub mod text;

pub use fields::{extract_fields, ExtractedFields};
pub use rules::ExtractionRules;
