//! Sensor port: reads the fixed vital-sign schema.

use crate::domain::VitalSigns;

/// Errors raised by the sensor array.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor {0} not responding")]
    NotResponding(String),

    #[error("Sensor read failed: {0}")]
    Read(String),
}

/// Trait for the unit's sensor array.
pub trait SensorArray: Send + Sync {
    /// Read one full set of vital signs.
    ///
    /// # Errors
    /// Returns `SensorError` if the hardware could not be read.
    fn read(&self) -> Result<VitalSigns, SensorError>;
}
