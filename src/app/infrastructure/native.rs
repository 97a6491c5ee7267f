//! Native window-chrome backends.
//!
//! A backend is chosen once at startup by [`detect_backend`] and owns the
//! result of the capability probe, so effect calls never look up symbols
//! again. Everything platform specific stays behind [`NativeChrome`].

use std::ffi::c_void;

use super::error::{Result, StyleError};

/// Opaque native window handle (`HWND` on Windows).
///
/// Only valid for the duration of the call it is passed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

/// DWM window attributes used for chrome effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DwmAttribute {
    /// Pre-20H1 dark title bar (builds 17763..18985).
    UseDarkModeLegacy = 19,
    /// `DWMWA_USE_IMMERSIVE_DARK_MODE`.
    UseImmersiveDarkMode = 20,
    /// `DWMWA_SYSTEMBACKDROP_TYPE`, documented from build 22523.
    SystemBackdropType = 38,
    /// Undocumented mica switch honoured by Windows 11 builds before 22523.
    MicaEffect = 1029,
}

/// `DWMSBT_DISABLE`
pub const BACKDROP_TYPE_DISABLE: i32 = 1;
/// `DWMSBT_MAINWINDOW` (mica)
pub const BACKDROP_TYPE_MAIN_WINDOW: i32 = 2;

/// Accent states understood by `SetWindowCompositionAttribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AccentState {
    Disabled = 0,
    EnableGradient = 1,
    EnableTransparentGradient = 2,
    EnableBlurBehind = 3,
    /// RS4 (1803)
    EnableAcrylicBlurBehind = 4,
    /// RS5 (1809)
    EnableHostBackdrop = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccentPolicy {
    pub state: AccentState,
    pub flags: u32,
    pub gradient_color: u32,
    pub animation_id: u32,
}

impl AccentPolicy {
    pub const fn new(state: AccentState) -> Self {
        Self {
            state,
            flags: 0,
            gradient_color: 0,
            animation_id: 0,
        }
    }
}

/// A single native operation against one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeCall {
    DwmAttribute { attribute: DwmAttribute, value: i32 },
    AccentPolicy(AccentPolicy),
}

impl NativeCall {
    /// True when the backend can execute this call at all.
    pub fn is_supported_by(&self, caps: Capabilities) -> bool {
        match self {
            Self::DwmAttribute { .. } => caps.dwm,
            Self::AccentPolicy(_) => caps.composition_attribute,
        }
    }
}

/// Result of the one-time capability probe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `DwmSetWindowAttribute` is callable.
    pub dwm: bool,
    /// `SetWindowCompositionAttribute` was found in user32.
    pub composition_attribute: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        dwm: false,
        composition_attribute: false,
    };

    pub fn any(&self) -> bool {
        self.dwm || self.composition_attribute
    }
}

/// Executes native chrome calls.
pub trait NativeChrome {
    fn capabilities(&self) -> Capabilities;

    fn invoke(&self, window: WindowHandle, call: &NativeCall) -> Result<()>;
}

/// Backend for platforms without window-chrome effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedChrome;

impl NativeChrome for UnsupportedChrome {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn invoke(&self, _window: WindowHandle, _call: &NativeCall) -> Result<()> {
        Err(StyleError::CapabilityAbsent("window chrome effects"))
    }
}

/// Probe the running platform once and return its backend.
#[cfg(target_os = "windows")]
pub fn detect_backend() -> Box<dyn NativeChrome> {
    let chrome = win32::Win32Chrome::probe();
    tracing::debug!("native chrome capabilities: {:?}", chrome.capabilities());
    Box::new(chrome)
}

/// Probe the running platform once and return its backend.
#[cfg(not(target_os = "windows"))]
pub fn detect_backend() -> Box<dyn NativeChrome> {
    Box::new(UnsupportedChrome)
}

#[cfg(target_os = "windows")]
mod win32 {
    use std::ffi::c_void;
    use std::mem::size_of;
    use std::ptr::from_ref;

    use windows::Win32::Foundation::{BOOL, HWND};
    use windows::Win32::Graphics::Dwm::{DWMWINDOWATTRIBUTE, DwmSetWindowAttribute};
    use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
    use windows::core::{s, w};

    use super::{Capabilities, NativeCall, NativeChrome, WindowHandle};
    use crate::app::infrastructure::error::{Result, StyleError};

    const WCA_ACCENT_POLICY: u32 = 19;

    #[repr(C)]
    struct RawAccentPolicy {
        accent_state: u32,
        accent_flags: u32,
        gradient_color: u32,
        animation_id: u32,
    }

    #[repr(C)]
    struct WindowCompositionAttribData {
        attrib: u32,
        pv_data: *mut c_void,
        cb_data: usize,
    }

    type SetWindowCompositionAttribute =
        unsafe extern "system" fn(HWND, *mut WindowCompositionAttribData) -> BOOL;

    pub struct Win32Chrome {
        set_wca: Option<SetWindowCompositionAttribute>,
    }

    impl Win32Chrome {
        pub fn probe() -> Self {
            // SAFETY: user32.dll is a system library; the exported symbol has
            // had this signature since Windows 7 even though it is not
            // declared in the SDK headers.
            let set_wca = unsafe {
                match LoadLibraryW(w!("user32.dll")) {
                    Ok(user32) => GetProcAddress(user32, s!("SetWindowCompositionAttribute"))
                        .map(|f| {
                            std::mem::transmute::<
                                unsafe extern "system" fn() -> isize,
                                SetWindowCompositionAttribute,
                            >(f)
                        }),
                    Err(_) => None,
                }
            };
            Self { set_wca }
        }
    }

    impl NativeChrome for Win32Chrome {
        fn capabilities(&self) -> Capabilities {
            Capabilities {
                dwm: true,
                composition_attribute: self.set_wca.is_some(),
            }
        }

        fn invoke(&self, window: WindowHandle, call: &NativeCall) -> Result<()> {
            let hwnd = HWND(window.as_ptr());
            match *call {
                NativeCall::DwmAttribute { attribute, value } => {
                    // SAFETY: `value` outlives the call and the size matches.
                    unsafe {
                        DwmSetWindowAttribute(
                            hwnd,
                            DWMWINDOWATTRIBUTE(attribute as i32),
                            from_ref(&value).cast(),
                            size_of::<i32>() as u32,
                        )
                    }
                    .map_err(|e| StyleError::NativeCall(e.to_string()))
                }
                NativeCall::AccentPolicy(policy) => {
                    let set_wca = self
                        .set_wca
                        .ok_or(StyleError::CapabilityAbsent("SetWindowCompositionAttribute"))?;
                    let mut raw = RawAccentPolicy {
                        accent_state: policy.state as u32,
                        accent_flags: policy.flags,
                        gradient_color: policy.gradient_color,
                        animation_id: policy.animation_id,
                    };
                    let mut data = WindowCompositionAttribData {
                        attrib: WCA_ACCENT_POLICY,
                        pv_data: (&mut raw as *mut RawAccentPolicy).cast(),
                        cb_data: size_of::<RawAccentPolicy>(),
                    };
                    // SAFETY: `raw` and `data` live on this frame for the
                    // whole call; the pointer came from the probe above.
                    let ok = unsafe { set_wca(hwnd, &mut data) };
                    if ok.as_bool() {
                        Ok(())
                    } else {
                        Err(StyleError::NativeCall(
                            "SetWindowCompositionAttribute returned FALSE".to_string(),
                        ))
                    }
                }
            }
        }
    }
}
