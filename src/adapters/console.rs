//! Console patient interface.
//!
//! Prints the unit's spoken/displayed narration to stdout and simulates
//! patient detection with a fixed delay.

use std::io::Write;
use std::time::Duration;

use crate::domain::Diagnosis;
use crate::ports::{PatientInterface, PatientPresence};

/// Patient interface that narrates to a writer (stdout by default).
pub struct ConsolePatientInterface {
    /// How long until the simulated patient steps up to the unit
    arrival_after: Duration,
    out: std::sync::Mutex<Box<dyn Write + Send>>,
}

impl ConsolePatientInterface {
    #[must_use]
    pub fn new(arrival_after: Duration) -> Self {
        Self::with_writer(arrival_after, Box::new(std::io::stdout()))
    }

    #[must_use]
    pub fn with_writer(arrival_after: Duration, out: Box<dyn Write + Send>) -> Self {
        Self {
            arrival_after,
            out: std::sync::Mutex::new(out),
        }
    }

    fn say(&self, line: &str) {
        // Narration is best-effort; a closed stdout must not end the visit.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }
}

impl PatientInterface for ConsolePatientInterface {
    fn wait_for_patient(&self, timeout: Option<Duration>) -> PatientPresence {
        self.say("Robot: Waiting for patient...");

        match timeout {
            Some(limit) if self.arrival_after > limit => {
                std::thread::sleep(limit);
                self.say("Robot: No patient detected.");
                PatientPresence::NotDetected
            }
            _ => {
                std::thread::sleep(self.arrival_after);
                self.say("Robot: Patient detected!");
                PatientPresence::Detected
            }
        }
    }

    fn guide(&self, instructions: &[&str]) {
        for line in instructions {
            self.say(&format!("Robot: {line}"));
        }
    }

    fn report_diagnosis(&self, diagnosis: &Diagnosis) {
        self.say(&format!(
            "Robot: Your heart health status is: {} ({})",
            diagnosis.label,
            diagnosis.label.description()
        ));
    }

    fn notify_failure(&self, notice: &str) {
        self.say(&format!("Robot: System failure. {notice}"));
    }
}
