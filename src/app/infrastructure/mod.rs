//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - OS appearance and version detection
//! - Native window chrome backends
//! - Error types

pub mod error;
pub mod native;
pub mod platform;
