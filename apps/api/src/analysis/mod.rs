// Resume analysis engine.
// Pipeline: extract text → segment sections → extract fields → classify →
// score → suggest. Everything after extraction is pure and total.

pub mod analyzer;
pub mod error;
pub mod extractor;
pub mod fields;
pub mod handlers;
pub mod impact;
pub mod models;
pub mod scoring;
pub mod segmenter;
pub mod skills;
pub mod store;
pub mod suggestions;
