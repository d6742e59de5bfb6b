//! Initialization logic for the observability of the services: tracing
//! subscriber setup shared between binaries and tests, and a panic hook
//! that reports through the log pipeline.

pub mod tracing;
