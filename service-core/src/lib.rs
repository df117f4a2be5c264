//! service-core: Shared infrastructure for the voice sample backend.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
