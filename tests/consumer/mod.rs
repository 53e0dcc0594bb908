//! Consumer integration test modules

pub mod logger;
pub mod scenarios;
