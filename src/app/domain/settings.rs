use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::scheme::SchemeOverrides;
use crate::app::infrastructure::error::StyleError;
use crate::app::services::observer::EdgeRule;

/// Shortest poll interval accepted from the settings file.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Backdrop material applied to windows on refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Backdrop {
    #[default]
    None,
    Blur,
    Acrylic,
    HostBackdrop,
    Mica,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    #[serde(default = "default_auto_change_palette")]
    pub auto_change_palette: bool,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// `ToggleOnMatch` only suits sources that report the light flag. The
    /// system source reports the dark flag, so with it a light desktop
    /// publishes `true` on the first tick.
    #[serde(default)]
    pub edge_rule: EdgeRule,

    #[serde(default)]
    pub backdrop: Backdrop,

    #[serde(default = "default_tint_title_bar")]
    pub tint_title_bar: bool,

    /// Toolkit look-and-feel name, applied at startup when set
    #[serde(default)]
    pub widget_style: Option<String>,

    #[serde(default)]
    pub dark_overrides: SchemeOverrides,

    #[serde(default)]
    pub light_overrides: SchemeOverrides,
}

fn default_auto_change_palette() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_tint_title_bar() -> bool {
    true
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            auto_change_palette: default_auto_change_palette(),
            poll_interval_ms: default_poll_interval_ms(),
            edge_rule: EdgeRule::default(),
            backdrop: Backdrop::default(),
            tint_title_bar: default_tint_title_bar(),
            widget_style: None,
            dark_overrides: SchemeOverrides::default(),
            light_overrides: SchemeOverrides::default(),
        }
    }
}

impl StyleSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(StyleError::Settings(format!(
                "poll interval {}ms is below the {}ms minimum",
                self.poll_interval_ms, MIN_POLL_INTERVAL_MS
            )));
        }
        if let Some(style) = &self.widget_style {
            if style.trim().is_empty() {
                return Err(StyleError::Settings("empty widget style name".to_string()));
            }
        }
        Ok(())
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(StyleError::Io(_)) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save();
                default
            }
            Err(e) => {
                tracing::warn!("Failed to load style settings: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, StyleError> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), StyleError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StyleError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("stylehelper");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::color::Rgb;
    use crate::app::domain::scheme::ColorRole;

    #[test]
    fn test_default_settings() {
        let settings = StyleSettings::default();
        assert!(settings.auto_change_palette);
        assert_eq!(settings.poll_interval_ms, 500);
        assert_eq!(settings.poll_interval(), Duration::from_millis(500));
        assert_eq!(settings.edge_rule, EdgeRule::OnChange);
        assert_eq!(settings.backdrop, Backdrop::None);
        assert!(settings.tint_title_bar);
        assert!(settings.widget_style.is_none());
        assert!(settings.dark_overrides.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        // Old config missing newer fields
        let json = r#"{"auto_change_palette": false, "backdrop": "Mica"}"#;
        let settings: StyleSettings = serde_json::from_str(json).unwrap();
        assert!(!settings.auto_change_palette);
        assert_eq!(settings.backdrop, Backdrop::Mica);
        assert_eq!(settings.poll_interval_ms, 500);
        assert_eq!(settings.edge_rule, EdgeRule::OnChange);
    }

    #[test]
    fn test_edge_rule_serialization() {
        let settings = StyleSettings {
            edge_rule: EdgeRule::ToggleOnMatch,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"ToggleOnMatch\""));
    }

    #[test]
    fn test_validate_rejects_short_interval() {
        let settings = StyleSettings {
            poll_interval_ms: 10,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(StyleError::Settings(_))));
        // The accessor still clamps for callers that skip validation
        assert_eq!(settings.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_validate_rejects_blank_style() {
        let settings = StyleSettings {
            widget_style: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = StyleSettings {
            backdrop: Backdrop::Acrylic,
            widget_style: Some("gtk+".to_string()),
            ..Default::default()
        };
        settings
            .dark_overrides
            .active
            .insert(ColorRole::Window, Rgb::new(16, 16, 16));
        settings.save_to(&path).unwrap();

        let loaded = StyleSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StyleSettings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StyleError::Io(_)));
    }

    #[test]
    fn test_load_from_invalid_color_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"light_overrides": {"active": {"Mid": "blue"}}}"#).unwrap();
        let err = StyleSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, StyleError::Json(_)));
    }
}
