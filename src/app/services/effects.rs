//! Window chrome effects: title-bar tint and backdrop materials.
//!
//! Every effect goes through one table keyed by (kind, minimum OS build).
//! The newest row the running build satisfies decides the native call; no
//! row means the OS cannot do it and the request is dropped. Nothing here
//! returns an error: an effect that cannot be applied is simply not applied.

use crate::app::infrastructure::native::{
    AccentPolicy, AccentState, BACKDROP_TYPE_DISABLE, BACKDROP_TYPE_MAIN_WINDOW, Capabilities,
    DwmAttribute, NativeCall, NativeChrome, WindowHandle, detect_backend,
};
use crate::app::infrastructure::platform::OsVersion;

/// Windows 10 RTM
pub const BUILD_WIN10: u32 = 10240;
/// Windows 10 1803: acrylic accent
pub const BUILD_RS4: u32 = 17134;
/// Windows 10 1809: legacy dark title bar, host backdrop accent
pub const BUILD_RS5: u32 = 17763;
/// Windows 10 20H1: documented immersive dark mode attribute
pub const BUILD_20H1: u32 = 18985;
/// Windows 11 21H2: undocumented mica attribute
pub const BUILD_WIN11: u32 = 22000;
/// Windows 11 22H2 preview: documented system backdrop type
pub const BUILD_SYSTEM_BACKDROP: u32 = 22523;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    TitleBarDark,
    Blur,
    Acrylic,
    HostBackdrop,
    /// Resolves to a DWM attribute but, like the other backdrops, is only
    /// attempted when the composition-attribute probe succeeded.
    Mica,
}

impl EffectKind {
    /// Capability gate that applies regardless of the resolved call.
    fn is_enabled_by(self, caps: Capabilities) -> bool {
        match self {
            Self::TitleBarDark => true,
            Self::Blur | Self::Acrylic | Self::HostBackdrop | Self::Mica => {
                caps.composition_attribute
            }
        }
    }
}

/// Accent-based backdrop selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlurKind {
    Disabled,
    Blur,
    Acrylic,
    HostBackdrop,
}

impl BlurKind {
    fn as_effect(self) -> (EffectKind, bool) {
        match self {
            Self::Disabled => (EffectKind::Blur, false),
            Self::Blur => (EffectKind::Blur, true),
            Self::Acrylic => (EffectKind::Acrylic, true),
            Self::HostBackdrop => (EffectKind::HostBackdrop, true),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Dwm(DwmAttribute),
    Accent(AccentState),
}

struct TableRow {
    kind: EffectKind,
    min_build: u32,
    target: Target,
}

/// Newest first within each kind.
const EFFECT_TABLE: &[TableRow] = &[
    TableRow {
        kind: EffectKind::TitleBarDark,
        min_build: BUILD_20H1,
        target: Target::Dwm(DwmAttribute::UseImmersiveDarkMode),
    },
    TableRow {
        kind: EffectKind::TitleBarDark,
        min_build: BUILD_RS5,
        target: Target::Dwm(DwmAttribute::UseDarkModeLegacy),
    },
    TableRow {
        kind: EffectKind::Mica,
        min_build: BUILD_SYSTEM_BACKDROP,
        target: Target::Dwm(DwmAttribute::SystemBackdropType),
    },
    TableRow {
        kind: EffectKind::Mica,
        min_build: BUILD_WIN11,
        target: Target::Dwm(DwmAttribute::MicaEffect),
    },
    TableRow {
        kind: EffectKind::HostBackdrop,
        min_build: BUILD_RS5,
        target: Target::Accent(AccentState::EnableHostBackdrop),
    },
    TableRow {
        kind: EffectKind::Acrylic,
        min_build: BUILD_RS4,
        target: Target::Accent(AccentState::EnableAcrylicBlurBehind),
    },
    TableRow {
        kind: EffectKind::Blur,
        min_build: BUILD_WIN10,
        target: Target::Accent(AccentState::EnableBlurBehind),
    },
];

/// One effect against one window. Built and consumed within a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectRequest {
    pub window: WindowHandle,
    pub kind: EffectKind,
    pub enabled: bool,
    pub os: OsVersion,
}

impl EffectRequest {
    /// Native call for this request, or `None` when the OS build has no
    /// way to express it.
    pub fn resolve(&self) -> Option<NativeCall> {
        if !self.os.is_windows_10_or_later() {
            return None;
        }
        let row = EFFECT_TABLE
            .iter()
            .find(|row| row.kind == self.kind && self.os.build >= row.min_build)?;

        let call = match row.target {
            Target::Dwm(DwmAttribute::SystemBackdropType) => NativeCall::DwmAttribute {
                attribute: DwmAttribute::SystemBackdropType,
                value: if self.enabled {
                    BACKDROP_TYPE_MAIN_WINDOW
                } else {
                    BACKDROP_TYPE_DISABLE
                },
            },
            Target::Dwm(attribute) => NativeCall::DwmAttribute {
                attribute,
                value: i32::from(self.enabled),
            },
            Target::Accent(state) => NativeCall::AccentPolicy(AccentPolicy::new(if self.enabled {
                state
            } else {
                AccentState::Disabled
            })),
        };
        Some(call)
    }
}

/// Applies chrome effects through a backend probed once at construction.
pub struct WindowEffectApplicator {
    backend: Box<dyn NativeChrome>,
    capabilities: Capabilities,
    os: OsVersion,
}

impl WindowEffectApplicator {
    pub fn new(backend: Box<dyn NativeChrome>, os: OsVersion) -> Self {
        let capabilities = backend.capabilities();
        Self {
            backend,
            capabilities,
            os,
        }
    }

    /// Applicator for the running OS.
    pub fn detect() -> Self {
        let applicator = Self::new(detect_backend(), OsVersion::detect());
        tracing::debug!(
            os = %applicator.os,
            capabilities = ?applicator.capabilities,
            "window effect applicator ready"
        );
        applicator
    }

    pub fn os_version(&self) -> OsVersion {
        self.os
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn set_title_bar_dark_color(&self, windows: &[WindowHandle], dark: bool) {
        self.apply_all(windows, EffectKind::TitleBarDark, dark);
    }

    pub fn set_blur_effect(&self, windows: &[WindowHandle], kind: BlurKind) {
        let (effect, enabled) = kind.as_effect();
        self.apply_all(windows, effect, enabled);
    }

    pub fn set_mica(&self, windows: &[WindowHandle], enabled: bool) {
        self.apply_all(windows, EffectKind::Mica, enabled);
    }

    fn apply_all(&self, windows: &[WindowHandle], kind: EffectKind, enabled: bool) {
        for &window in windows {
            self.apply(EffectRequest {
                window,
                kind,
                enabled,
                os: self.os,
            });
        }
    }

    /// Best effort: unsupported or failing calls are logged and dropped.
    pub fn apply(&self, request: EffectRequest) {
        let Some(call) = request.resolve() else {
            tracing::trace!(
                kind = ?request.kind,
                os = %request.os,
                "effect not available on this OS build"
            );
            return;
        };

        if !call.is_supported_by(self.capabilities) || !request.kind.is_enabled_by(self.capabilities)
        {
            tracing::trace!(?call, "native capability absent, skipping");
            return;
        }

        if let Err(e) = self.backend.invoke(request.window, &call) {
            tracing::debug!(?call, "effect not applied: {}", e);
        }
    }
}
