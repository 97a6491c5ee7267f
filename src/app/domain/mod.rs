//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - RGB colors and the shared swatch table
//! - Color schemes keyed by semantic role
//! - Persisted style settings

pub mod color;
pub mod scheme;
pub mod settings;

pub use color::{Rgb, swatch};
pub use scheme::{ColorGroup, ColorRole, ColorScheme, SchemeOverrides};
pub use settings::{Backdrop, StyleSettings};
