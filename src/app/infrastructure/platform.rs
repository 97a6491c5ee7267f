use std::fmt;
#[cfg(target_os = "linux")]
use std::cell::OnceCell;

use super::error::{Result, StyleError};

/// Synchronous source of the OS dark-mode flag.
pub trait AppearanceSource {
    /// Returns `Ok(true)` when the OS prefers dark rendering.
    fn is_dark(&self) -> Result<bool>;

    /// True for sources whose value is really the inverse (light) flag,
    /// such as the raw `AppsUseLightTheme` registry value.
    fn reports_light_flag(&self) -> bool {
        false
    }
}

/// Reads the appearance preference from the running desktop.
///
/// On Linux the GNOME key is resolved by the first query and reused, so
/// every later query spawns a single `gsettings` process.
#[derive(Debug, Default)]
pub struct SystemAppearance {
    #[cfg(target_os = "linux")]
    gnome_key: OnceCell<Option<GnomeKey>>,
}

impl SystemAppearance {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AppearanceSource for SystemAppearance {
    #[cfg(target_os = "linux")]
    fn is_dark(&self) -> Result<bool> {
        let key = self.gnome_key(|key| gsettings_get(key).ok().flatten());
        let Some(key) = key else {
            return Err(StyleError::QueryUnavailable(
                "gsettings exposes no appearance key".to_string(),
            ));
        };
        match gsettings_get(key)? {
            Some(value) => Ok(key.is_dark(&value)),
            None => Err(StyleError::QueryUnavailable(format!(
                "gsettings could not read {}",
                key.name()
            ))),
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn is_dark(&self) -> Result<bool> {
        query_system_dark_mode()
    }
}

/// Best-effort dark-mode check that never fails; light is assumed when the
/// platform cannot be queried.
pub fn detect_system_dark_mode() -> bool {
    SystemAppearance::new().is_dark().unwrap_or_else(|e| {
        tracing::debug!("dark mode detection failed: {}", e);
        false
    })
}

#[cfg(target_os = "windows")]
fn query_system_dark_mode() -> Result<bool> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let key = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .map_err(|e| StyleError::QueryUnavailable(e.to_string()))?;

    // AppsUseLightTheme: 0 = dark mode, 1 = light mode
    let value: u32 = key
        .get_value("AppsUseLightTheme")
        .map_err(|e| StyleError::QueryUnavailable(e.to_string()))?;
    Ok(value == 0)
}

#[cfg(target_os = "macos")]
fn query_system_dark_mode() -> Result<bool> {
    use std::process::Command;

    let output = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .map_err(|e| StyleError::QueryUnavailable(e.to_string()))?;

    // The key is absent entirely while the light appearance is active.
    if !output.status.success() {
        return Ok(false);
    }
    let style = String::from_utf8_lossy(&output.stdout).to_lowercase();
    Ok(style.contains("dark"))
}

#[cfg(target_os = "linux")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GnomeKey {
    ColorScheme,
    // Older GNOME releases only expose the theme name
    GtkTheme,
}

#[cfg(target_os = "linux")]
impl GnomeKey {
    const PREFERENCE: [GnomeKey; 2] = [GnomeKey::ColorScheme, GnomeKey::GtkTheme];

    fn name(self) -> &'static str {
        match self {
            GnomeKey::ColorScheme => "color-scheme",
            GnomeKey::GtkTheme => "gtk-theme",
        }
    }

    fn is_dark(self, value: &str) -> bool {
        match self {
            GnomeKey::ColorScheme => value.contains("prefer-dark"),
            GnomeKey::GtkTheme => value.to_lowercase().contains("dark"),
        }
    }
}

#[cfg(target_os = "linux")]
impl SystemAppearance {
    /// Resolves the key on first use. `read` returns `None` when the key
    /// cannot be read at all; a readable `'default'` still selects it.
    fn gnome_key(&self, read: impl FnMut(GnomeKey) -> Option<String>) -> Option<GnomeKey> {
        *self.gnome_key.get_or_init(|| {
            let key = resolve_gnome_key(read);
            tracing::debug!(key = ?key.map(GnomeKey::name), "gnome appearance key resolved");
            key
        })
    }
}

#[cfg(target_os = "linux")]
fn resolve_gnome_key(mut read: impl FnMut(GnomeKey) -> Option<String>) -> Option<GnomeKey> {
    GnomeKey::PREFERENCE
        .into_iter()
        .find(|key| read(*key).is_some())
}

/// `Ok(None)` when gsettings ran but rejected the key (unknown schema/key).
#[cfg(target_os = "linux")]
fn gsettings_get(key: GnomeKey) -> Result<Option<String>> {
    use std::process::Command;

    let output = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", key.name()])
        .output()
        .map_err(|e| StyleError::QueryUnavailable(e.to_string()))?;

    if !output.status.success() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn query_system_dark_mode() -> Result<bool> {
    Err(StyleError::QueryUnavailable(
        "no appearance setting on this platform".to_string(),
    ))
}

/// Operating system version triple. All zero when unknown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl OsVersion {
    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }

    /// Version of the running OS, or the zero version when it cannot be
    /// determined or is irrelevant (non-Windows).
    pub fn detect() -> Self {
        #[cfg(target_os = "windows")]
        {
            if let Some(version) = windows_version() {
                return version;
            }
        }
        Self::default()
    }

    /// Windows 10 and later report major version 10.
    pub fn is_windows_10_or_later(&self) -> bool {
        self.major >= 10
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// `GetVersionEx` lies to unmanifested processes, so ask ntdll directly.
#[cfg(target_os = "windows")]
fn windows_version() -> Option<OsVersion> {
    use std::mem::size_of;
    use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
    use windows::Win32::System::SystemInformation::OSVERSIONINFOW;
    use windows::core::{s, w};

    type RtlGetVersion = unsafe extern "system" fn(*mut OSVERSIONINFOW) -> i32;

    // SAFETY: ntdll.dll is mapped into every process and RtlGetVersion has
    // had this signature since Windows 2000. The struct is fully initialized
    // and sized before the call.
    unsafe {
        let ntdll = LoadLibraryW(w!("ntdll.dll")).ok()?;
        let proc = GetProcAddress(ntdll, s!("RtlGetVersion"))?;
        let rtl_get_version: RtlGetVersion = std::mem::transmute(proc);

        let mut info = OSVERSIONINFOW {
            dwOSVersionInfoSize: size_of::<OSVERSIONINFOW>() as u32,
            dwMajorVersion: 0,
            dwMinorVersion: 0,
            dwBuildNumber: 0,
            dwPlatformId: 0,
            szCSDVersion: [0; 128],
        };

        if rtl_get_version(&mut info) >= 0 {
            Some(OsVersion::new(
                info.dwMajorVersion,
                info.dwMinorVersion,
                info.dwBuildNumber,
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_never_panics() {
        // Result depends on the host desktop; only the call contract matters.
        let _ = detect_system_dark_mode();
    }

    #[test]
    fn test_os_version_ordering() {
        let rs5 = OsVersion::new(10, 0, 17763);
        let win11 = OsVersion::new(10, 0, 22000);
        assert!(rs5 < win11);
        assert!(rs5.is_windows_10_or_later());
        assert!(!OsVersion::new(6, 3, 9600).is_windows_10_or_later());
    }

    #[test]
    fn test_os_version_display() {
        assert_eq!(OsVersion::new(10, 0, 22621).to_string(), "10.0.22621");
        assert_eq!(OsVersion::default().to_string(), "0.0.0");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_color_scheme_default_does_not_fall_back() {
        let mut asked = Vec::new();
        let key = resolve_gnome_key(|key| {
            asked.push(key);
            Some("'default'\n".to_string())
        });
        assert_eq!(key, Some(GnomeKey::ColorScheme));
        assert_eq!(asked, vec![GnomeKey::ColorScheme]);
        assert!(!GnomeKey::ColorScheme.is_dark("'default'\n"));
        assert!(GnomeKey::ColorScheme.is_dark("'prefer-dark'\n"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_gtk_theme_used_when_color_scheme_unsupported() {
        let key = resolve_gnome_key(|key| match key {
            GnomeKey::ColorScheme => None,
            GnomeKey::GtkTheme => Some("'Adwaita-dark'\n".to_string()),
        });
        assert_eq!(key, Some(GnomeKey::GtkTheme));
        assert!(GnomeKey::GtkTheme.is_dark("'Adwaita-dark'\n"));
        assert!(!GnomeKey::GtkTheme.is_dark("'Adwaita'\n"));

        assert_eq!(resolve_gnome_key(|_| None), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_gnome_key_resolved_once() {
        let source = SystemAppearance::new();
        let mut reads = 0;
        let first = source.gnome_key(|_| {
            reads += 1;
            None
        });
        let second = source.gnome_key(|_| {
            reads += 1;
            Some("'prefer-dark'".to_string())
        });
        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(reads, GnomeKey::PREFERENCE.len());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_detect_version_off_windows_is_zero() {
        assert_eq!(OsVersion::detect(), OsVersion::default());
    }
}
