//! Test modules for the worker-pool consumer
//!
//! Tests are organized by functional area.
