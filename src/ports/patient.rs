//! Patient interface port: detection, guidance and result presentation.

use std::time::Duration;

use crate::domain::Diagnosis;

/// Outcome of waiting for a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientPresence {
    Detected,
    /// The wait timed out with nobody at the unit
    NotDetected,
}

/// Trait for the unit's patient-facing I/O (sensors trigger, speaker, display).
pub trait PatientInterface: Send + Sync {
    /// Block until a patient is detected or `timeout` elapses.
    ///
    /// `None` waits indefinitely.
    fn wait_for_patient(&self, timeout: Option<Duration>) -> PatientPresence;

    /// Give the patient capture instructions, in order.
    fn guide(&self, instructions: &[&str]);

    /// Present a diagnosis to the patient.
    fn report_diagnosis(&self, diagnosis: &Diagnosis);

    /// Surface a terminal failure notice.
    fn notify_failure(&self, notice: &str);
}
