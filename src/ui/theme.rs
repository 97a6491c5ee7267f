use fltk::{app, enums::Color, misc::Tooltip, prelude::*, window::Window};

use crate::app::domain::color::Rgb;
use crate::app::domain::scheme::{ColorGroup, ColorRole, ColorScheme};
use crate::app::infrastructure::native::WindowHandle;
use crate::app::services::palette::PaletteSink;

/// Look-and-feel names FLTK ships with.
const STYLE_NAMES: &[&str] = &["base", "gtk+", "gleam", "plastic", "oxy"];

pub fn fltk_color(rgb: Rgb) -> Color {
    Color::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Native handle of a shown window.
/// Must be called AFTER window.show() to have a valid HWND
pub fn window_handle<W: WindowExt>(window: &W) -> WindowHandle {
    WindowHandle::from_raw(window.raw_handle() as usize)
}

impl From<&Window> for WindowHandle {
    fn from(window: &Window) -> Self {
        window_handle(window)
    }
}

/// Pushes schemes into FLTK's global color map.
#[derive(Debug, Default)]
pub struct FltkPalette {
    border_accent: Option<Rgb>,
}

impl FltkPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn border_accent(&self) -> Option<Rgb> {
        self.border_accent
    }
}

impl PaletteSink for FltkPalette {
    fn apply(&mut self, scheme: &ColorScheme, border_accent: Rgb) {
        let window = scheme.color(ColorRole::Window);
        let base = scheme.color(ColorRole::Base);
        let text = scheme.color(ColorRole::WindowText);
        let highlight = scheme.color(ColorRole::Highlight);
        let inactive = scheme.color_in(ColorGroup::Disabled, ColorRole::Text);

        app::set_background_color(window.r, window.g, window.b);
        app::set_background2_color(base.r, base.g, base.b);
        app::set_foreground_color(text.r, text.g, text.b);
        app::set_selection_color(highlight.r, highlight.g, highlight.b);
        app::set_inactive_color(inactive.r, inactive.g, inactive.b);

        Tooltip::set_color(fltk_color(scheme.color(ColorRole::ToolTipBase)));
        Tooltip::set_text_color(fltk_color(scheme.color(ColorRole::ToolTipText)));

        // Thin frames and toolbar separators are drawn with this shade
        app::set_color(Color::Dark2, border_accent.r, border_accent.g, border_accent.b);
        self.border_accent = Some(border_accent);

        app::redraw();
    }
}

pub fn style_names() -> &'static [&'static str] {
    STYLE_NAMES
}

fn scheme_for(name: &str) -> Option<app::Scheme> {
    match name.trim().to_lowercase().as_str() {
        "base" => Some(app::Scheme::Base),
        "gtk+" | "gtk" => Some(app::Scheme::Gtk),
        "gleam" => Some(app::Scheme::Gleam),
        "plastic" => Some(app::Scheme::Plastic),
        "oxy" => Some(app::Scheme::Oxy),
        _ => None,
    }
}

/// Switch the toolkit look-and-feel. Unknown names are ignored.
pub fn set_widget_style(name: &str) -> bool {
    match scheme_for(name) {
        Some(scheme) => {
            app::set_scheme(scheme);
            true
        }
        None => {
            tracing::warn!("unknown widget style '{}'", name);
            false
        }
    }
}
