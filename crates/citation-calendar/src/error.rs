use crate::calendar::CalendarError;
use crate::config::ConfigError;
use crate::ingest::ImportError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ImportError),
    Export(csv::Error),
    Calendar(CalendarError),
    Serialization(serde_json::Error),
    UnknownJurisdiction(String),
    AmbiguousJurisdiction { city: String, states: Vec<String> },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Export(err) => write!(f, "daily record file error: {}", err),
            AppError::Calendar(err) => write!(f, "calendar error: {}", err),
            AppError::Serialization(err) => write!(f, "failed to render JSON output: {}", err),
            AppError::UnknownJurisdiction(city) => {
                write!(f, "no daily records found for jurisdiction '{}'", city)
            }
            AppError::AmbiguousJurisdiction { city, states } => write!(
                f,
                "'{}' appears under several states ({}); pass --state to pick one",
                city,
                states.join(", ")
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Calendar(err) => Some(err),
            AppError::Serialization(err) => Some(err),
            AppError::UnknownJurisdiction(_) | AppError::AmbiguousJurisdiction { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}

impl From<CalendarError> for AppError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
