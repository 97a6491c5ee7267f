use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::color::{Rgb, swatch};

pub const ROLE_COUNT: usize = 18;

/// Semantic role a color plays in the interface. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorRole {
    Window,
    WindowText,
    Base,
    AlternateBase,
    ToolTipBase,
    ToolTipText,
    Text,
    Button,
    ButtonText,
    BrightText,
    Light,
    Midlight,
    Dark,
    Mid,
    Shadow,
    Highlight,
    HighlightedText,
    Link,
}

impl ColorRole {
    pub const ALL: [ColorRole; ROLE_COUNT] = [
        Self::Window,
        Self::WindowText,
        Self::Base,
        Self::AlternateBase,
        Self::ToolTipBase,
        Self::ToolTipText,
        Self::Text,
        Self::Button,
        Self::ButtonText,
        Self::BrightText,
        Self::Light,
        Self::Midlight,
        Self::Dark,
        Self::Mid,
        Self::Shadow,
        Self::Highlight,
        Self::HighlightedText,
        Self::Link,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Widget state a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorGroup {
    Active,
    Disabled,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 2] = [Self::Active, Self::Disabled];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Baseline active colors, indexed by `ColorRole`.
const STANDARD_ACTIVE: [Rgb; ROLE_COUNT] = [
    Rgb::new(239, 239, 239), // Window
    swatch::BLACK,           // WindowText
    swatch::WHITE,           // Base
    Rgb::new(247, 247, 247), // AlternateBase
    Rgb::new(255, 255, 220), // ToolTipBase
    swatch::BLACK,           // ToolTipText
    swatch::BLACK,           // Text
    Rgb::new(239, 239, 239), // Button
    swatch::BLACK,           // ButtonText
    swatch::WHITE,           // BrightText
    swatch::WHITE,           // Light
    Rgb::new(202, 202, 202), // Midlight
    Rgb::new(159, 159, 159), // Dark
    Rgb::new(184, 184, 184), // Mid
    Rgb::new(118, 118, 118), // Shadow
    Rgb::new(48, 140, 198),  // Highlight
    swatch::WHITE,           // HighlightedText
    Rgb::new(0, 0, 255),     // Link
];

const STANDARD_DISABLED: &[(ColorRole, Rgb)] = &[
    (ColorRole::WindowText, swatch::LIGHT_GRAY),
    (ColorRole::Text, swatch::LIGHT_GRAY),
    (ColorRole::ButtonText, swatch::LIGHT_GRAY),
    (ColorRole::Base, Rgb::new(239, 239, 239)),
    (ColorRole::Highlight, Rgb::new(145, 145, 145)),
];

const DARK_ACTIVE: &[(ColorRole, Rgb)] = &[
    (ColorRole::Window, swatch::DARK_GRAY),
    (ColorRole::WindowText, swatch::WHITE),
    (ColorRole::Light, swatch::LIGHT_GRAY),
    (ColorRole::Midlight, swatch::MID_DARK_GRAY),
    (ColorRole::Dark, swatch::DARK_GRAY),
    (ColorRole::Mid, swatch::MID_DARK_GRAY),
    (ColorRole::Shadow, swatch::NEAR_BLACK),
    (ColorRole::Base, swatch::NEAR_BLACK),
    (ColorRole::AlternateBase, swatch::DARK_GRAY),
    (ColorRole::ToolTipBase, swatch::DARK_GRAY),
    (ColorRole::ToolTipText, swatch::WHITE),
    (ColorRole::Text, swatch::WHITE),
    (ColorRole::Button, swatch::DARK_GRAY),
    (ColorRole::ButtonText, swatch::WHITE),
    (ColorRole::BrightText, swatch::RED),
    (ColorRole::Link, swatch::BLUE),
    (ColorRole::Highlight, swatch::BLUE),
    (ColorRole::HighlightedText, swatch::BLACK),
];

const DARK_DISABLED: &[(ColorRole, Rgb)] = &[
    (ColorRole::Text, swatch::MID_DARK_GRAY),
    (ColorRole::WindowText, swatch::MID_DARK_GRAY),
    (ColorRole::ButtonText, swatch::MID_DARK_GRAY),
    (ColorRole::HighlightedText, swatch::MID_DARK_GRAY),
    (ColorRole::Base, swatch::MID_DARK_GRAY),
    (ColorRole::Window, swatch::MID_DARK_GRAY),
    (ColorRole::Highlight, swatch::MID_DARK_GRAY),
];

/// One color per (group, role). Role keys never change; values can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    colors: [[Rgb; ROLE_COUNT]; 2],
}

impl ColorScheme {
    /// The platform baseline that custom schemes are compared against.
    pub fn standard() -> Self {
        let mut scheme = Self {
            colors: [STANDARD_ACTIVE; 2],
        };
        scheme.extend(ColorGroup::Disabled, STANDARD_DISABLED);
        scheme
    }

    pub fn default_light() -> Self {
        Self::standard()
    }

    pub fn default_dark() -> Self {
        let mut scheme = Self::standard();
        for &(role, color) in DARK_ACTIVE {
            scheme.set_color(role, color);
        }
        scheme.extend(ColorGroup::Disabled, DARK_DISABLED);
        scheme
    }

    /// Active-group color for `role`.
    pub fn color(&self, role: ColorRole) -> Rgb {
        self.color_in(ColorGroup::Active, role)
    }

    pub fn color_in(&self, group: ColorGroup, role: ColorRole) -> Rgb {
        self.colors[group.index()][role.index()]
    }

    /// Set `role` in every group.
    pub fn set_color(&mut self, role: ColorRole, color: Rgb) {
        for group in ColorGroup::ALL {
            self.set_color_in(group, role, color);
        }
    }

    pub fn set_color_in(&mut self, group: ColorGroup, role: ColorRole, color: Rgb) {
        self.colors[group.index()][role.index()] = color;
    }

    pub fn midlight(&self) -> Rgb {
        self.color(ColorRole::Midlight)
    }

    pub fn mid(&self) -> Rgb {
        self.color(ColorRole::Mid)
    }

    /// All entries in (group, role) order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorGroup, ColorRole, Rgb)> + '_ {
        ColorGroup::ALL.into_iter().flat_map(move |group| {
            ColorRole::ALL
                .into_iter()
                .map(move |role| (group, role, self.color_in(group, role)))
        })
    }

    fn extend(&mut self, group: ColorGroup, entries: &[(ColorRole, Rgb)]) {
        for &(role, color) in entries {
            self.set_color_in(group, role, color);
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-group role overrides loaded from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeOverrides {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub active: BTreeMap<ColorRole, Rgb>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub disabled: BTreeMap<ColorRole, Rgb>,
}

impl SchemeOverrides {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.disabled.is_empty()
    }

    pub fn apply_to(&self, scheme: &mut ColorScheme) {
        for (&role, &color) in &self.active {
            scheme.set_color_in(ColorGroup::Active, role, color);
        }
        for (&role, &color) in &self.disabled {
            scheme.set_color_in(ColorGroup::Disabled, role, color);
        }
    }

    /// `base` with these overrides applied.
    pub fn applied(&self, mut base: ColorScheme) -> ColorScheme {
        self.apply_to(&mut base);
        base
    }
}
