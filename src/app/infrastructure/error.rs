use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    /// The platform feature or native entry point is not available here.
    #[error("Capability absent: {0}")]
    CapabilityAbsent(&'static str),

    /// The OS appearance flag cannot be read on this platform right now.
    #[error("Appearance query unavailable: {0}")]
    QueryUnavailable(String),

    #[error("Native call failed: {0}")]
    NativeCall(String),
}

/// Convenience type alias for Results with StyleError
pub type Result<T> = std::result::Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StyleError = io_err.into();
        assert!(matches!(err, StyleError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = StyleError::CapabilityAbsent("SetWindowCompositionAttribute");
        assert_eq!(
            err.to_string(),
            "Capability absent: SetWindowCompositionAttribute"
        );

        let err = StyleError::QueryUnavailable("gsettings not found".to_string());
        assert_eq!(
            err.to_string(),
            "Appearance query unavailable: gsettings not found"
        );

        let err = StyleError::Settings("poll interval too short".to_string());
        assert_eq!(err.to_string(), "Settings error: poll interval too short");
    }
}
