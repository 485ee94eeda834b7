//! Device configuration.
//!
//! Sources, lowest precedence first: `Default`, an optional JSON file, then
//! environment overrides. Malformed environment values are ignored.
//!
//! Supported environment variables:
//! - `ROBOMEDITRUST_NPI_INDICES="1,3,2,4"`
//! - `ROBOMEDITRUST_SELF_CHECK_DELAY_MS`
//! - `ROBOMEDITRUST_PATIENT_TIMEOUT_MS` (`0` waits indefinitely)
//! - `ROBOMEDITRUST_PATIENT_ARRIVAL_MS`
//! - `ROBOMEDITRUST_PREVIEW_LEN`
//! - `ROBOMEDITRUST_MODEL_ID`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DiffDnaTransform, DEFAULT_NPI_INDICES};

/// Errors while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings for one intake unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Default NPI swap sequence, consumed pairwise
    pub npi_indices: Vec<usize>,

    /// Simulated duration of the power-on self-check
    pub self_check_delay_ms: u64,

    /// Give up waiting for a patient after this long; `None` waits forever
    pub patient_timeout_ms: Option<u64>,

    /// When the simulated patient steps up to the unit
    pub patient_arrival_ms: u64,

    /// Maximum characters of a ciphertext shown in debug narration
    pub preview_len: usize,

    /// Global model requested from the inference service
    pub model_id: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            npi_indices: DEFAULT_NPI_INDICES.to_vec(),
            self_check_delay_ms: 1_000,
            patient_timeout_ms: Some(30_000),
            patient_arrival_ms: 2_000,
            preview_len: 50,
            model_id: "prm-global-v1".to_string(),
        }
    }
}

impl DeviceConfig {
    /// Load configuration: defaults, then `path` (if any), then environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Read a JSON file; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup` (normally the process environment).
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(indices) = lookup("ROBOMEDITRUST_NPI_INDICES").and_then(|v| parse_indices(&v)) {
            self.npi_indices = indices;
        }
        if let Some(ms) = number("ROBOMEDITRUST_SELF_CHECK_DELAY_MS") {
            self.self_check_delay_ms = ms;
        }
        if let Some(ms) = number("ROBOMEDITRUST_PATIENT_TIMEOUT_MS") {
            self.patient_timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(ms) = number("ROBOMEDITRUST_PATIENT_ARRIVAL_MS") {
            self.patient_arrival_ms = ms;
        }
        if let Some(len) = number("ROBOMEDITRUST_PREVIEW_LEN") {
            self.preview_len = usize::try_from(len).unwrap_or(usize::MAX);
        }
        if let Some(model) = lookup("ROBOMEDITRUST_MODEL_ID") {
            if !model.trim().is_empty() {
                self.model_id = model.trim().to_string();
            }
        }

        self
    }

    #[must_use]
    pub fn self_check_delay(&self) -> Duration {
        Duration::from_millis(self.self_check_delay_ms)
    }

    #[must_use]
    pub fn patient_timeout(&self) -> Option<Duration> {
        self.patient_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn patient_arrival(&self) -> Duration {
        Duration::from_millis(self.patient_arrival_ms)
    }

    /// Privacy transform configured with `npi_indices`.
    #[must_use]
    pub fn transform(&self) -> DiffDnaTransform {
        DiffDnaTransform::new(self.npi_indices.clone())
    }
}

/// Parse a comma-separated index list such as `"1,3,2,4"`.
///
/// Returns `None` if any entry is not a non-negative integer.
#[must_use]
pub fn parse_indices(text: &str) -> Option<Vec<usize>> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Vec::new());
    }
    text.split(',')
        .map(|part| part.trim().parse::<usize>().ok())
        .collect()
}
