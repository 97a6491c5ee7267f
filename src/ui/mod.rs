//! FLTK integration: palette sink, window handles and the poll timer.

pub mod poll;
pub mod theme;

pub use poll::PollTimer;
pub use theme::{FltkPalette, set_widget_style, style_names, window_handle};

/// FLTK keeps its colors and timeouts in process globals; tests touching
/// them take this lock.
#[cfg(test)]
pub(crate) static FLTK_GLOBALS: std::sync::Mutex<()> = std::sync::Mutex::new(());
