//! Follow the operating system's light/dark preference.
//!
//! A [`ThemeObserver`] polls the OS appearance flag on the UI thread and
//! announces edges, a [`PaletteManager`] swaps the application palette, and a
//! [`WindowEffectApplicator`] tints title bars and applies backdrop materials
//! where the platform supports them. [`StyleContext`] ties the three together.

pub mod app;
pub mod ui;

pub use app::*;
