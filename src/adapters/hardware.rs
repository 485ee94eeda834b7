//! Simulated unit hardware: diagnostics probe and sensor array.

use std::time::Duration;

use crate::domain::VitalSigns;
use crate::ports::{DiagnosticsProbe, SelfCheckFailure, SensorArray, SensorError};

/// Reference reading returned by the simulated sensors.
#[must_use]
pub fn reference_vitals() -> VitalSigns {
    VitalSigns {
        age: 52,
        sex: 1,
        cp: 0,
        trestbps: 125,
        chol: 212,
        fbs: 0,
        restecg: 1,
        thalach: 168,
        exang: 0,
        oldpeak: 1.0,
        slope: 2,
        ca: 2,
        thal: 3,
    }
}

/// Diagnostics probe that sleeps for `delay` and then reports a fixed result.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDiagnostics {
    delay: Duration,
    failure: Option<SelfCheckFailure>,
}

impl SimulatedDiagnostics {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// Make every self-check fail with `failure`.
    #[must_use]
    pub fn failing(mut self, failure: SelfCheckFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}

impl DiagnosticsProbe for SimulatedDiagnostics {
    fn run_self_check(&self) -> Result<(), SelfCheckFailure> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

/// Sensor array that always returns the same vital signs.
#[derive(Debug, Clone)]
pub struct SimulatedSensorArray {
    vitals: VitalSigns,
}

impl Default for SimulatedSensorArray {
    fn default() -> Self {
        Self::new(reference_vitals())
    }
}

impl SimulatedSensorArray {
    #[must_use]
    pub fn new(vitals: VitalSigns) -> Self {
        Self { vitals }
    }
}

impl SensorArray for SimulatedSensorArray {
    fn read(&self) -> Result<VitalSigns, SensorError> {
        Ok(self.vitals.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_pass_by_default() {
        assert!(SimulatedDiagnostics::default().run_self_check().is_ok());
    }

    #[test]
    fn test_forced_failure() {
        let probe = SimulatedDiagnostics::new(Duration::ZERO)
            .failing(SelfCheckFailure::LowBattery { percent: 3 });
        let err = probe.run_self_check().expect_err("should fail");
        assert_eq!(err.to_string(), "Battery too low: 3%");
    }

    #[test]
    fn test_sensor_returns_reference() {
        let vitals = SimulatedSensorArray::default().read().expect("reads");
        assert_eq!(vitals, reference_vitals());
        assert!(vitals.validate().is_ok());
    }
}
