//! Application-wide style context.
//!
//! Built once at startup and passed by reference to whatever needs the
//! observer, the palette manager or the effect applicator.

use std::cell::RefCell;
use std::rc::Rc;

use super::domain::scheme::ColorScheme;
use super::domain::settings::{Backdrop, StyleSettings};
use super::infrastructure::native::WindowHandle;
use super::infrastructure::platform::{AppearanceSource, SystemAppearance};
use super::services::effects::{BlurKind, WindowEffectApplicator};
use super::services::observer::{SubscriptionId, ThemeObserver};
use super::services::palette::{PaletteManager, PaletteSink};

pub struct StyleContext {
    settings: StyleSettings,
    observer: Rc<ThemeObserver>,
    palette: Rc<RefCell<PaletteManager>>,
    effects: WindowEffectApplicator,
    palette_subscription: SubscriptionId,
}

impl StyleContext {
    pub fn new(
        settings: StyleSettings,
        source: Box<dyn AppearanceSource>,
        sink: Box<dyn PaletteSink>,
        effects: WindowEffectApplicator,
    ) -> Self {
        let observer = Rc::new(
            ThemeObserver::new(source)
                .with_edge_rule(settings.edge_rule)
                .with_interval(settings.poll_interval()),
        );
        if !observer.edge_rule_fits_source() {
            tracing::warn!(
                edge_rule = ?settings.edge_rule,
                "edge rule does not match the appearance source polarity; published values will be inverted"
            );
        }

        let mut manager = PaletteManager::new(sink);
        manager
            .set_custom_dark_palette(settings.dark_overrides.applied(ColorScheme::default_dark()))
            .set_custom_light_palette(settings.light_overrides.applied(ColorScheme::default_light()))
            .set_auto_change_palette(settings.auto_change_palette);
        let palette = Rc::new(RefCell::new(manager));
        let palette_subscription = PaletteManager::follow(&palette, &observer);

        Self {
            settings,
            observer,
            palette,
            effects,
            palette_subscription,
        }
    }

    /// Context wired to the running desktop and its native chrome backend.
    pub fn detect(settings: StyleSettings, sink: Box<dyn PaletteSink>) -> Self {
        Self::new(
            settings,
            Box::new(SystemAppearance::new()),
            sink,
            WindowEffectApplicator::detect(),
        )
    }

    pub fn settings(&self) -> &StyleSettings {
        &self.settings
    }

    pub fn observer(&self) -> &Rc<ThemeObserver> {
        &self.observer
    }

    pub fn palette(&self) -> &Rc<RefCell<PaletteManager>> {
        &self.palette
    }

    pub fn effects(&self) -> &WindowEffectApplicator {
        &self.effects
    }

    /// Re-apply title-bar tint and the configured backdrop to `windows`.
    pub fn refresh_windows(&self, windows: &[WindowHandle], is_dark: bool) {
        if self.settings.tint_title_bar {
            self.effects.set_title_bar_dark_color(windows, is_dark);
        }
        match self.settings.backdrop {
            Backdrop::None => {}
            Backdrop::Blur => self.effects.set_blur_effect(windows, BlurKind::Blur),
            Backdrop::Acrylic => self.effects.set_blur_effect(windows, BlurKind::Acrylic),
            Backdrop::HostBackdrop => self.effects.set_blur_effect(windows, BlurKind::HostBackdrop),
            Backdrop::Mica => self.effects.set_mica(windows, true),
        }
    }
}

impl Drop for StyleContext {
    fn drop(&mut self) {
        self.observer.unsubscribe(self.palette_subscription);
    }
}
