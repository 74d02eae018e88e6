pub mod embedding;
pub mod handlers;
pub mod matcher;
