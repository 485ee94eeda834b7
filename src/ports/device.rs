//! Device port: power-on diagnostics.

/// Reason a self-check did not pass.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelfCheckFailure {
    #[error("Subsystem {subsystem} failed: {detail}")]
    Subsystem { subsystem: String, detail: String },

    #[error("Battery too low: {percent}%")]
    LowBattery { percent: u8 },
}

/// Trait for the unit's power-on diagnostics.
///
/// May block for as long as the diagnostics take. A failure is fatal for the
/// current cycle; retrying is the caller's decision.
pub trait DiagnosticsProbe: Send + Sync {
    /// Run the self-check.
    ///
    /// # Errors
    /// Returns the first failing subsystem.
    fn run_self_check(&self) -> Result<(), SelfCheckFailure>;
}
