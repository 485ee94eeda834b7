//! Loopback transmitter: keeps sent ciphertexts in memory.
//!
//! Used when the unit runs without a hospital uplink, and by tests.

use std::sync::Mutex;

use crate::domain::Ciphertext;
use crate::ports::{Delivery, TransmissionError, Transmitter};

/// Transmitter that records every payload and acknowledges it.
#[derive(Debug, Default)]
pub struct LoopbackTransmitter {
    sent: Mutex<Vec<Ciphertext>>,
}

impl LoopbackTransmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads handed off so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Ciphertext> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl Transmitter for LoopbackTransmitter {
    fn send(&self, ciphertext: &Ciphertext) -> Result<Delivery, TransmissionError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| TransmissionError::Send("loopback buffer poisoned".into()))?;
        sent.push(ciphertext.clone());

        Ok(Delivery::Acknowledged {
            receipt: format!("loopback-{}", sent.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_acknowledges() {
        let tx = LoopbackTransmitter::new();
        let ct = Ciphertext::sealed(b"ACGT".to_vec(), "fp");

        let first = tx.send(&ct).expect("sends");
        let second = tx.send(&ct).expect("sends");

        assert_eq!(
            first,
            Delivery::Acknowledged {
                receipt: "loopback-1".into()
            }
        );
        assert_eq!(
            second,
            Delivery::Acknowledged {
                receipt: "loopback-2".into()
            }
        );
        assert_eq!(tx.sent().len(), 2);
    }
}
