//! Infrastructure layer module
//!
//! Adapters around the domain:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - JSON/YAML input documents
//! - Tree graph and metric oracle implementations of the domain ports

pub mod config;
pub mod document;
pub mod graph;
pub mod logging;
pub mod metric;
