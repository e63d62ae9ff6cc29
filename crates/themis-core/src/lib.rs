pub mod config;
pub mod context;
pub mod corpus;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod judge;
pub mod merge;
pub mod model;
pub mod providers;
pub mod report;
pub mod sampling;
pub mod storage;
pub mod table;
pub mod thresholds;

pub use errors::{Result, ThemisError};
