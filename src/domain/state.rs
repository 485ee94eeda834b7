//! Operating stages of the intake unit.

use serde::{Deserialize, Serialize};

/// Stage the device session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceState {
    PoweredOff,
    SelfCheck,
    AwaitingPatient,
    Guiding,
    Capturing,
    Transforming,
    Transmitting,
    LocalInferring,
    Reporting,
    SessionComplete,
    Aborted,
}

impl DeviceState {
    /// Whether the cycle has ended in this state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::SessionComplete | Self::Aborted)
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// Any non-terminal stage may fall to `Aborted` (fatal self-check,
    /// no patient, or a collaborator error). A terminal stage may only
    /// restart at `PoweredOff`.
    #[must_use]
    pub fn can_transition_to(self, next: DeviceState) -> bool {
        use DeviceState::*;

        if next == Aborted {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (PoweredOff, SelfCheck)
                | (SelfCheck, AwaitingPatient)
                | (AwaitingPatient, Guiding)
                | (Guiding, Capturing)
                | (Capturing, Transforming)
                | (Transforming, Transmitting)
                | (Transforming, LocalInferring)
                | (Transmitting, SessionComplete)
                | (LocalInferring, Reporting)
                | (Reporting, SessionComplete)
                | (SessionComplete, PoweredOff)
                | (Aborted, PoweredOff)
        )
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PoweredOff => "powered-off",
            Self::SelfCheck => "self-check",
            Self::AwaitingPatient => "awaiting-patient",
            Self::Guiding => "guiding",
            Self::Capturing => "capturing",
            Self::Transforming => "transforming",
            Self::Transmitting => "transmitting",
            Self::LocalInferring => "local-inferring",
            Self::Reporting => "reporting",
            Self::SessionComplete => "session-complete",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
