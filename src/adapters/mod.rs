//! Adapters layer: Concrete implementations of ports.
//!
//! - `hardware`: simulated diagnostics probe and sensor array
//! - `console`: patient narration on stdout
//! - `inference`: simulated global model and secure inference
//! - `transmission`: in-memory loopback uplink
//! - `secure_channel`: placeholder encrypt/decrypt
//! - `sanitize`: redaction of payloads and key material in logs

pub mod console;
pub mod hardware;
pub mod inference;
pub mod sanitize;
pub mod secure_channel;
pub mod transmission;

pub use console::ConsolePatientInterface;
pub use hardware::{reference_vitals, SimulatedDiagnostics, SimulatedSensorArray};
pub use inference::SimulatedInferenceEngine;
pub use secure_channel::SimulatedSecureChannel;
pub use transmission::LoopbackTransmitter;
