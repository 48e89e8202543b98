use crate::calendar::{CalendarError, FiscalYearConvention};
use crate::jurisdiction::ConventionTable;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub pipeline: PipelineConfig,
    pub fiscal: FiscalConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let source_dir = env::var("CITATION_SOURCE_DIR")
            .unwrap_or_else(|_| "00_source_data".to_string())
            .into();
        let output_path = env::var("CITATION_OUTPUT_PATH")
            .unwrap_or_else(|_| "05_clean_data/processed_data.csv".to_string())
            .into();

        let default_convention =
            env::var("CITATION_DEFAULT_CONVENTION").unwrap_or_else(|_| "jun30".to_string());
        let default_convention = default_convention
            .parse::<FiscalYearConvention>()
            .map_err(|source| ConfigError::InvalidConvention {
                value: default_convention.clone(),
                source,
            })?;
        let aug31_states = env::var("CITATION_AUG31_STATES")
            .unwrap_or_else(|_| "texas,tx".to_string())
            .split(',')
            .map(|state| state.trim().to_ascii_lowercase())
            .filter(|state| !state.is_empty())
            .collect();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            pipeline: PipelineConfig {
                source_dir,
                output_path,
            },
            fiscal: FiscalConfig {
                default_convention,
                aug31_states,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where raw event logs are read from and the daily CSV is written to.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FiscalConfig {
    pub default_convention: FiscalYearConvention,
    pub aug31_states: Vec<String>,
}

impl FiscalConfig {
    pub fn convention_table(&self) -> ConventionTable {
        self.aug31_states.iter().fold(
            ConventionTable::new(self.default_convention),
            |table, state| table.with_state(state, FiscalYearConvention::Aug31),
        )
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidConvention {
        value: String,
        source: CalendarError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConvention { value, .. } => write!(
                f,
                "CITATION_DEFAULT_CONVENTION '{}' must be jun30 or aug31",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidConvention { source, .. } => Some(source),
        }
    }
}
