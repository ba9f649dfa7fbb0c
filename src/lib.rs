pub mod analyzer;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod ingest;
pub mod logging;
pub mod table;
pub mod tracking;
