//! Device orchestrator: drives one patient visit through the unit's stages.
//!
//! ```text
//! PoweredOff -> SelfCheck -> AwaitingPatient -> Guiding -> Capturing -> Transforming
//!     Transforming -> Transmitting -> SessionComplete               (online)
//!     Transforming -> LocalInferring -> Reporting -> SessionComplete (offline)
//! any active stage -> Aborted
//! ```
//!
//! Stages run strictly in sequence on the calling thread. Collaborator
//! errors are returned to the caller as-is; nothing is retried here.

use std::sync::Arc;

use crate::domain::{
    new_visit_id, DeviceKeys, DeviceState, Diagnosis, DiffDnaTransform, PerturbedSequence,
};
use crate::ports::{
    Delivery, DiagnosticsProbe, InferenceEngine, ModelHandle, PatientInterface, PatientPresence,
    SecureChannel, SelfCheckFailure, SensorArray, Transmitter,
};
use crate::{IntakeError, Result};

use super::DeviceConfig;

/// Instructions given to the patient before capture.
pub const GUIDANCE: [&str; 2] = [
    "Please place your fingers on the sensors.",
    "Measuring ECG, Blood Pressure, SpO2...",
];

/// External collaborators a device session drives.
#[derive(Clone)]
pub struct DeviceCollaborators {
    pub diagnostics: Arc<dyn DiagnosticsProbe>,
    pub patient: Arc<dyn PatientInterface>,
    pub sensors: Arc<dyn SensorArray>,
    pub inference: Arc<dyn InferenceEngine>,
    pub transmitter: Arc<dyn Transmitter>,
    pub channel: Arc<dyn SecureChannel>,
}

/// Why a cycle ended in `Aborted` without an error.
#[derive(Debug, Clone)]
pub enum AbortReason {
    SelfCheckFailed(SelfCheckFailure),
    PatientNotDetected,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfCheckFailed(failure) => write!(f, "self-check failed: {failure}"),
            Self::PatientNotDetected => write!(f, "no patient detected"),
        }
    }
}

/// How a cycle ended.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Online branch: payload handed to the hospital network
    Transmitted { delivery: Delivery, wire_bytes: usize },
    /// Offline branch: diagnosis shown to the patient
    Diagnosed(Diagnosis),
    Aborted(AbortReason),
}

/// Per-unit orchestration state.
///
/// Holds at most one active stage. The model handle is fetched on the
/// first offline cycle and reused until the session is dropped.
pub struct DeviceSession {
    config: DeviceConfig,
    keys: DeviceKeys,
    ports: DeviceCollaborators,
    transform: DiffDnaTransform,
    connected: bool,
    model: Option<ModelHandle>,
    state: DeviceState,
    history: Vec<DeviceState>,
    visit_id: Option<String>,
}

impl DeviceSession {
    #[must_use]
    pub fn new(config: DeviceConfig, keys: DeviceKeys, ports: DeviceCollaborators) -> Self {
        let transform = config.transform();
        Self {
            config,
            keys,
            ports,
            transform,
            connected: false,
            model: None,
            state: DeviceState::PoweredOff,
            history: vec![DeviceState::PoweredOff],
            visit_id: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Stages visited by the most recent cycle, in order.
    #[must_use]
    pub fn history(&self) -> &[DeviceState] {
        &self.history
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub fn cached_model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    /// Run one full visit.
    ///
    /// Self-check failure and an absent patient end the cycle as
    /// `CycleOutcome::Aborted`.
    ///
    /// # Errors
    /// Returns the collaborator error that stopped the cycle; the session is
    /// left in `Aborted` and can run another cycle.
    pub fn run_full_cycle(&mut self, online: bool) -> Result<CycleOutcome> {
        if self.state.is_terminal() {
            self.transition(DeviceState::PoweredOff)?;
        }
        self.history.clear();
        self.history.push(self.state);

        self.connected = online;
        let visit_id = new_visit_id();
        tracing::info!(visit = %visit_id, online, "Starting intake cycle");
        self.visit_id = Some(visit_id);

        let result = self.run_stages();
        if let Err(e) = &result {
            tracing::error!(stage = %self.state, "Intake cycle failed: {e}");
            if !self.state.is_terminal() {
                self.state = DeviceState::Aborted;
                self.history.push(DeviceState::Aborted);
            }
        }

        self.visit_id = None;
        result
    }

    fn run_stages(&mut self) -> Result<CycleOutcome> {
        tracing::info!("Powering on, running system diagnostics...");
        self.transition(DeviceState::SelfCheck)?;
        if let Err(failure) = self.ports.diagnostics.run_self_check() {
            self.ports.patient.notify_failure(&failure.to_string());
            return self.abort(AbortReason::SelfCheckFailed(failure));
        }
        tracing::info!("System OK");

        self.transition(DeviceState::AwaitingPatient)?;
        let presence = self
            .ports
            .patient
            .wait_for_patient(self.config.patient_timeout());
        if presence == PatientPresence::NotDetected {
            return self.abort(AbortReason::PatientNotDetected);
        }

        self.transition(DeviceState::Guiding)?;
        self.ports.patient.guide(&GUIDANCE);

        self.transition(DeviceState::Capturing)?;
        let vitals = self.ports.sensors.read()?;
        if let Err(violations) = vitals.validate() {
            for violation in &violations {
                tracing::warn!("Implausible reading: {violation}");
            }
        }
        let readings = vitals.to_reading_set();
        tracing::info!(fields = readings.len(), "Vital signs captured");

        self.transition(DeviceState::Transforming)?;
        let payload = self.transform.apply(&readings);
        tracing::info!(
            symbols = payload.len(),
            pairs = self.transform.indices().len() / 2,
            "Applied Diff-DNA privacy on-device"
        );

        if self.connected {
            self.transition(DeviceState::Transmitting)?;
            self.transmit(&payload)
        } else {
            self.transition(DeviceState::LocalInferring)?;
            self.infer_locally(&payload)
        }
    }

    fn transmit(&mut self, payload: &PerturbedSequence) -> Result<CycleOutcome> {
        let ciphertext = self
            .ports
            .channel
            .encrypt(payload.as_str().as_bytes(), &self.keys.hospital_public);
        let wire_bytes = ciphertext.to_wire()?.len();
        tracing::debug!(
            preview = %ciphertext.preview(self.config.preview_len),
            "Ciphertext preview"
        );
        tracing::info!(
            wire_bytes,
            recipient = %ciphertext.recipient_fingerprint,
            "Sending encrypted data to hospital network"
        );

        let delivery = self.ports.transmitter.send(&ciphertext)?;
        if let Delivery::Rejected { reason } = &delivery {
            tracing::warn!("Hospital network rejected payload: {reason}");
        }

        self.complete()?;
        Ok(CycleOutcome::Transmitted {
            delivery,
            wire_bytes,
        })
    }

    fn infer_locally(&mut self, payload: &PerturbedSequence) -> Result<CycleOutcome> {
        tracing::info!("No connection, performing local secure inference");

        let model = match self.model.take() {
            Some(model) => model,
            None => self.ports.inference.load_model(&self.config.model_id)?,
        };
        let inferred = self.ports.inference.infer(&model, payload);
        self.model = Some(model);
        let sealed = inferred?;

        let label = self.ports.channel.decrypt(&sealed, &self.keys.robot_private);

        self.transition(DeviceState::Reporting)?;
        let diagnosis = Diagnosis::new(self.visit_id.clone().unwrap_or_default(), label);
        tracing::info!(label = %diagnosis.label, "Diagnosis ready");
        self.ports.patient.report_diagnosis(&diagnosis);

        self.complete()?;
        Ok(CycleOutcome::Diagnosed(diagnosis))
    }

    fn complete(&mut self) -> Result<()> {
        self.transition(DeviceState::SessionComplete)?;
        if let Some(visit) = &self.visit_id {
            tracing::info!(visit = %visit, "Session complete");
        }
        Ok(())
    }

    fn abort(&mut self, reason: AbortReason) -> Result<CycleOutcome> {
        tracing::warn!("Cycle aborted: {reason}");
        self.transition(DeviceState::Aborted)?;
        Ok(CycleOutcome::Aborted(reason))
    }

    fn transition(&mut self, next: DeviceState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(IntakeError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(from = %self.state, to = %next, "Device state transition");
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}
