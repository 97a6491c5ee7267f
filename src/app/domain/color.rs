use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::app::infrastructure::error::StyleError;

/// 24-bit RGB color. Serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    pub fn name(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Rgb {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| StyleError::Settings(format!("invalid color '{}': {}", s, e)))?;
        Ok(Self::new(bytes[0], bytes[1], bytes[2]))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Named colors shared by every built-in scheme.
pub mod swatch {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const LIGHT_GRAY: Rgb = Rgb::new(190, 190, 190);
    pub const GRAY: Rgb = Rgb::new(164, 166, 168);
    pub const MID_DARK_GRAY: Rgb = Rgb::new(68, 68, 68);
    pub const DARK_GRAY: Rgb = Rgb::new(53, 53, 53);
    pub const NEAR_BLACK: Rgb = Rgb::new(25, 25, 25);
    pub const BLUE: Rgb = Rgb::new(42, 130, 218);
}
