//! Application layer: Use cases and services.
//!
//! This module wires the domain transform to the ports and drives the
//! intake unit through a patient visit.

mod config;
mod orchestrator;

pub use config::{parse_indices, ConfigError, DeviceConfig};
pub use orchestrator::{AbortReason, CycleOutcome, DeviceCollaborators, DeviceSession, GUIDANCE};
