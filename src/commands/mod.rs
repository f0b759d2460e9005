pub mod clear;
pub mod ingest;
pub mod preview;
