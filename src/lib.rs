pub mod app;
pub mod core;
pub mod logger;
pub mod queue;

include!(concat!(env!("OUT_DIR"), "/version.rs"));
