//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Rgb, ColorScheme, StyleSettings)
//! - `services/` - Theme observer, palette manager, window effects
//! - `infrastructure/` - External integrations (OS appearance, native chrome, error)
//! - `context.rs` - Application-wide coordinator built once at startup

pub mod context;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use context::StyleContext;
pub use domain::{Backdrop, ColorGroup, ColorRole, ColorScheme, Rgb, SchemeOverrides, StyleSettings};
pub use infrastructure::error::{Result, StyleError};
pub use infrastructure::native::WindowHandle;
pub use infrastructure::platform::{AppearanceSource, OsVersion, detect_system_dark_mode};
pub use services::effects::{BlurKind, EffectKind, EffectRequest, WindowEffectApplicator};
pub use services::observer::{EdgeRule, SubscriptionId, ThemeObserver};
pub use services::palette::{PaletteManager, PaletteSink};
