//! Common test utilities and helpers

pub mod test_helpers;
