//! Target roles and learning resources offered alongside an analysis.

pub mod courses;
pub mod handlers;
pub mod roles;
pub mod videos;
