//! Domain layer for treeclimb
//!
//! This module contains the core value types, the collaborator ports and the
//! domain error type. Nothing here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{OptimizerError, OptimizerResult};
