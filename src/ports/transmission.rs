//! Transmission port: hands sealed payloads to the hospital network.

use crate::domain::Ciphertext;

/// Link-level errors raised by the transmitter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransmissionError {
    #[error("Network link unavailable: {0}")]
    LinkDown(String),

    #[error("Transmission failed: {0}")]
    Send(String),
}

/// Result of a completed hand-off.
///
/// Both variants count as a finished transmission; only `Err` aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Acknowledged { receipt: String },
    Rejected { reason: String },
}

/// Trait for the outbound network link.
pub trait Transmitter: Send + Sync {
    /// Send one ciphertext.
    ///
    /// # Errors
    /// Returns `TransmissionError` if the payload could not be handed off.
    fn send(&self, ciphertext: &Ciphertext) -> Result<Delivery, TransmissionError>;
}
