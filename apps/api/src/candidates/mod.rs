pub mod documents;
pub mod handlers;
pub mod ingest;
pub mod store;
