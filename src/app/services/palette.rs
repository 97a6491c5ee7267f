use std::cell::RefCell;
use std::rc::Rc;

use crate::app::domain::color::Rgb;
use crate::app::domain::scheme::ColorScheme;
use crate::app::services::observer::{SubscriptionId, ThemeObserver};

/// Application-wide palette target (the toolkit's global colors plus any
/// auxiliary chrome such as tooltips).
pub trait PaletteSink {
    fn apply(&mut self, scheme: &ColorScheme, border_accent: Rgb);
}

/// Border accent for `scheme`: the baseline palette gets the softer
/// midlight, anything custom gets the stronger mid.
pub fn border_accent_for(scheme: &ColorScheme, baseline: &ColorScheme) -> Rgb {
    if scheme == baseline {
        scheme.midlight()
    } else {
        scheme.mid()
    }
}

/// Holds the light and dark schemes and activates one at a time.
pub struct PaletteManager {
    sink: Box<dyn PaletteSink>,
    baseline: ColorScheme,
    custom_dark: ColorScheme,
    custom_light: ColorScheme,
    active: Option<ColorScheme>,
    border_accent: Option<Rgb>,
    is_dark: bool,
    auto_change: bool,
}

impl PaletteManager {
    pub fn new(sink: Box<dyn PaletteSink>) -> Self {
        Self::with_baseline(sink, ColorScheme::standard())
    }

    /// Manager whose default-scheme comparison uses `baseline`.
    pub fn with_baseline(sink: Box<dyn PaletteSink>, baseline: ColorScheme) -> Self {
        Self {
            sink,
            custom_dark: ColorScheme::default_dark(),
            custom_light: ColorScheme::default_light(),
            baseline,
            active: None,
            border_accent: None,
            is_dark: false,
            auto_change: false,
        }
    }

    /// Takes effect on the next activation.
    pub fn set_custom_dark_palette(&mut self, scheme: ColorScheme) -> &mut Self {
        self.custom_dark = scheme;
        self
    }

    /// Takes effect on the next activation.
    pub fn set_custom_light_palette(&mut self, scheme: ColorScheme) -> &mut Self {
        self.custom_light = scheme;
        self
    }

    pub fn set_palette(&mut self, dark: bool) -> &mut Self {
        let scheme = if dark {
            self.custom_dark.clone()
        } else {
            self.custom_light.clone()
        };
        let accent = border_accent_for(&scheme, &self.baseline);

        tracing::debug!(
            dark,
            border_accent = %accent,
            "activating palette"
        );
        self.sink.apply(&scheme, accent);

        self.is_dark = dark;
        self.active = Some(scheme);
        self.border_accent = Some(accent);
        self
    }

    pub fn set_dark_palette(&mut self) -> &mut Self {
        self.set_palette(true)
    }

    pub fn set_light_palette(&mut self) -> &mut Self {
        self.set_palette(false)
    }

    pub fn set_auto_change_palette(&mut self, enabled: bool) -> &mut Self {
        self.auto_change = enabled;
        self
    }

    pub fn auto_change_palette(&self) -> bool {
        self.auto_change
    }

    /// Observer callback: activates the matching scheme when auto-change is on.
    pub fn on_color_scheme_changed(&mut self, is_dark: bool) {
        if self.auto_change {
            self.set_palette(is_dark);
        }
    }

    /// Polarity of the last activated scheme (light before any activation).
    pub fn current_is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn active_scheme(&self) -> Option<&ColorScheme> {
        self.active.as_ref()
    }

    pub fn border_accent(&self) -> Option<Rgb> {
        self.border_accent
    }

    pub fn custom_dark_palette(&self) -> &ColorScheme {
        &self.custom_dark
    }

    pub fn custom_light_palette(&self) -> &ColorScheme {
        &self.custom_light
    }

    /// Route `observer` notifications into `manager`. Holds a weak
    /// reference, so dropping the manager silences the subscription.
    pub fn follow(manager: &Rc<RefCell<Self>>, observer: &ThemeObserver) -> SubscriptionId {
        let weak = Rc::downgrade(manager);
        observer.subscribe(move |is_dark| {
            if let Some(manager) = weak.upgrade() {
                manager.borrow_mut().on_color_scheme_changed(is_dark);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::color::swatch;
    use crate::app::domain::scheme::ColorRole;
    use crate::app::infrastructure::error::{Result, StyleError};
    use crate::app::infrastructure::platform::AppearanceSource;
    use crate::app::services::observer::EdgeRule;
    use std::cell::Cell;

    type Applied = Rc<RefCell<Vec<(ColorScheme, Rgb)>>>;

    struct RecordingSink(Applied);

    impl PaletteSink for RecordingSink {
        fn apply(&mut self, scheme: &ColorScheme, border_accent: Rgb) {
            self.0.borrow_mut().push((scheme.clone(), border_accent));
        }
    }

    fn manager() -> (PaletteManager, Applied) {
        let applied = Applied::default();
        let manager = PaletteManager::new(Box::new(RecordingSink(applied.clone())));
        (manager, applied)
    }

    struct FixedSource(Rc<Cell<bool>>);

    impl AppearanceSource for FixedSource {
        fn is_dark(&self) -> Result<bool> {
            Ok(self.0.get())
        }
    }

    struct DeadSource;

    impl AppearanceSource for DeadSource {
        fn is_dark(&self) -> Result<bool> {
            Err(StyleError::QueryUnavailable("test".to_string()))
        }
    }

    #[test]
    fn test_set_palette_twice_is_idempotent() {
        let (mut manager, applied) = manager();
        manager.set_palette(true);
        let first_scheme = manager.active_scheme().cloned();
        let first_accent = manager.border_accent();

        manager.set_palette(true);
        assert_eq!(manager.active_scheme().cloned(), first_scheme);
        assert_eq!(manager.border_accent(), first_accent);

        let applied = applied.borrow();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], applied[1]);
    }

    #[test]
    fn test_baseline_scheme_uses_midlight() {
        let (mut manager, _) = manager();
        manager.set_light_palette();
        let standard = ColorScheme::standard();
        assert_eq!(manager.border_accent(), Some(standard.midlight()));
        assert!(!manager.current_is_dark());
    }

    #[test]
    fn test_custom_scheme_uses_mid() {
        let (mut manager, _) = manager();
        manager.set_dark_palette();
        assert_eq!(manager.border_accent(), Some(swatch::MID_DARK_GRAY));
        assert!(manager.current_is_dark());

        let mut custom = ColorScheme::standard();
        custom.set_color(ColorRole::Window, swatch::GRAY);
        manager.set_custom_light_palette(custom.clone()).set_palette(false);
        assert_eq!(manager.border_accent(), Some(custom.mid()));
        assert_ne!(custom.mid(), custom.midlight());
    }

    #[test]
    fn test_accent_rule_uses_value_equality() {
        let baseline = ColorScheme::standard();
        // A separately built but identical scheme still counts as baseline
        assert_eq!(border_accent_for(&ColorScheme::default_light(), &baseline), baseline.midlight());

        let mut tweaked = ColorScheme::standard();
        tweaked.set_color_in(
            crate::app::domain::scheme::ColorGroup::Disabled,
            ColorRole::Link,
            swatch::RED,
        );
        assert_eq!(border_accent_for(&tweaked, &baseline), tweaked.mid());
    }

    #[test]
    fn test_custom_palette_is_not_retroactive() {
        let (mut manager, applied) = manager();
        manager.set_palette(true);

        let mut custom = ColorScheme::default_dark();
        custom.set_color(ColorRole::Highlight, swatch::RED);
        manager.set_custom_dark_palette(custom.clone());

        assert_eq!(manager.active_scheme(), Some(&ColorScheme::default_dark()));
        assert_eq!(applied.borrow().len(), 1);

        manager.set_palette(true);
        assert_eq!(manager.active_scheme(), Some(&custom));
        assert_eq!(manager.custom_dark_palette(), &custom);
    }

    #[test]
    fn test_auto_change_applies_once_per_notification() {
        let (manager, applied) = manager();
        let manager = Rc::new(RefCell::new(manager));
        let observer = ThemeObserver::new(Box::new(DeadSource));
        PaletteManager::follow(&manager, &observer);

        manager.borrow_mut().set_auto_change_palette(true);
        observer.notify(true);
        assert_eq!(applied.borrow().len(), 1);
        assert!(manager.borrow().current_is_dark());

        observer.notify(false);
        assert_eq!(applied.borrow().len(), 2);
        assert_eq!(applied.borrow()[1].0, ColorScheme::default_light());
    }

    #[test]
    fn test_auto_change_off_ignores_notifications() {
        let (manager, applied) = manager();
        let manager = Rc::new(RefCell::new(manager));
        let observer = ThemeObserver::new(Box::new(DeadSource));
        PaletteManager::follow(&manager, &observer);

        assert!(!manager.borrow().auto_change_palette());
        for i in 0..5 {
            observer.notify(i % 2 == 0);
        }
        assert!(applied.borrow().is_empty());
        assert!(manager.borrow().active_scheme().is_none());
    }

    #[test]
    fn test_follow_through_observer_ticks() {
        let (manager, applied) = manager();
        let manager = Rc::new(RefCell::new(manager));
        manager.borrow_mut().set_auto_change_palette(true);

        let os_dark = Rc::new(Cell::new(false));
        let observer = ThemeObserver::new(Box::new(FixedSource(os_dark.clone())))
            .with_edge_rule(EdgeRule::OnChange);
        PaletteManager::follow(&manager, &observer);

        observer.tick();
        assert!(applied.borrow().is_empty());

        os_dark.set(true);
        observer.tick();
        observer.tick();
        assert_eq!(applied.borrow().len(), 1);
        assert!(manager.borrow().current_is_dark());
    }

    #[test]
    fn test_dropped_manager_is_silent() {
        let (manager, applied) = manager();
        let manager = Rc::new(RefCell::new(manager));
        manager.borrow_mut().set_auto_change_palette(true);
        let observer = ThemeObserver::new(Box::new(DeadSource));
        PaletteManager::follow(&manager, &observer);

        drop(manager);
        observer.notify(true);
        assert!(applied.borrow().is_empty());
    }
}
