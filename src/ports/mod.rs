//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the device orchestrator and hardware, network and crypto services.

mod device;
mod inference;
mod patient;
mod secure_channel;
mod sensor;
mod transmission;

pub use device::{DiagnosticsProbe, SelfCheckFailure};
pub use inference::{InferenceEngine, InferenceError, ModelHandle};
pub use patient::{PatientInterface, PatientPresence};
pub use secure_channel::SecureChannel;
pub use sensor::{SensorArray, SensorError};
pub use transmission::{Delivery, TransmissionError, Transmitter};
