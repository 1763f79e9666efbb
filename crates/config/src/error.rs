use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Zoom outside the supported steps. Callers must pass one of `ZOOM_VALUES`.
    InvalidZoom(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidZoom(zoom) => write!(f, "invalid zoom value: {zoom}"),
        }
    }
}

impl std::error::Error for ConfigError {}
