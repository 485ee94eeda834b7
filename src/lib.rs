//! # RoboMediTrust
//!
//! On-device vital-sign capture for an autonomous medical intake unit.
//!
//! This crate provides:
//! - The Diff-DNA privacy transform (nucleotide encoding + swap noise)
//!   applied before any reading leaves the device
//! - A device orchestrator that drives one patient visit from power-on to
//!   either transmission or a locally inferred diagnosis
//! - Simulated collaborators for running the unit without hardware
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and the privacy transform
//! - `ports`: Trait definitions for hardware, network, inference and crypto
//! - `adapters`: Simulated implementations and log sanitization
//! - `application`: Configuration and the device session state machine

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{AbortReason, CycleOutcome, DeviceConfig, DeviceSession};
pub use domain::{DeviceState, DiagnosisLabel, ReadingSet, VitalSigns};

/// Result type for RoboMediTrust operations
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Main error type for RoboMediTrust
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Sensor collaborator failed: {0}")]
    Sensor(#[from] ports::SensorError),

    #[error("Inference collaborator failed: {0}")]
    Inference(#[from] ports::InferenceError),

    #[error("Transmission collaborator failed: {0}")]
    Transmission(#[from] ports::TransmissionError),

    #[error("Cryptographic operation failed: {0}")]
    Crypto(#[from] domain::CryptoError),

    #[error("Configuration error: {0}")]
    Config(#[from] application::ConfigError),

    #[error("Illegal state transition: {from} -> {to}")]
    IllegalTransition {
        from: domain::DeviceState,
        to: domain::DeviceState,
    },
}
