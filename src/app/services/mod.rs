//! Services layer - the moving parts.
//!
//! - Appearance polling and change notification
//! - Palette activation
//! - Window chrome effects

pub mod effects;
pub mod observer;
pub mod palette;
