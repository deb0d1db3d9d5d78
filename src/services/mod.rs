pub mod description;
pub mod ingest;
