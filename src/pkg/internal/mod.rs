pub mod adaptors;
pub mod analysis;
pub mod auth;
pub mod records;
pub mod storage;

pub mod ingest;
