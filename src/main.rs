//! RoboMediTrust: on-device intake unit
//!
//! Runs one full patient visit against the simulated collaborators.
//!
//! ```bash
//! robomeditrust [--online|--offline] [--config <path>] [--indices 1,3,2,4]
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use robomeditrust::adapters::sanitize::SanitizingMakeWriter;
use robomeditrust::adapters::{
    ConsolePatientInterface, LoopbackTransmitter, SimulatedDiagnostics, SimulatedInferenceEngine,
    SimulatedSecureChannel, SimulatedSensorArray,
};
use robomeditrust::application::{parse_indices, DeviceCollaborators};
use robomeditrust::domain::{DeviceKeys, KeyToken};
use robomeditrust::ports::Delivery;
use robomeditrust::{CycleOutcome, DeviceConfig, DeviceSession};

const USAGE: &str =
    "Usage: robomeditrust [--online|--offline] [--config <path>] [--indices 1,3,2,4]";

const DEMO_HOSPITAL_PUB: &str = "HOSP_PUB_123";
const DEMO_ROBOT_PRIV: &str = "ROBOT_PRIV_456";

struct Args {
    online: bool,
    config: Option<PathBuf>,
    indices: Option<Vec<usize>>,
}

fn parse_args<I>(args: I) -> Result<Option<Args>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = Args {
        online: true,
        config: None,
        indices: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--online" => parsed.online = true,
            "--offline" => parsed.online = false,
            "--config" => {
                let path = args.next().unwrap_or_default();
                if path.is_empty() {
                    bail!("--config needs a path\n{USAGE}");
                }
                parsed.config = Some(PathBuf::from(path));
            }
            "--indices" => {
                let raw = args.next().unwrap_or_default();
                if raw.trim().is_empty() {
                    bail!("--indices needs a comma-separated list\n{USAGE}");
                }
                let Some(indices) = parse_indices(&raw) else {
                    bail!("Invalid index list {raw:?}\n{USAGE}");
                };
                parsed.indices = Some(indices);
            }
            "-h" | "--help" => {
                println!("{USAGE}\n\nRuns one intake cycle. --online transmits the sealed payload, --offline infers a diagnosis on the device.");
                return Ok(None);
            }
            _ => bail!("Unknown arg: {arg}\n{USAGE}"),
        }
    }

    Ok(Some(parsed))
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Stdout carries the patient narration; logs go to stderr unless a file is requested.
    let log_mode = std::env::var("ROBOMEDITRUST_LOG_MODE").unwrap_or_else(|_| "stderr".to_string());

    let to_file = log_mode == "file";
    let (writer, guard) = if to_file {
        let log_file = std::env::var("ROBOMEDITRUST_LOG_FILE")
            .unwrap_or_else(|_| "robomeditrust.log".to_string());

        if let Some(parent) = Path::new(&log_file).parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open log file {log_file}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(!to_file)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    Ok(guard)
}

/// Resolve a key token: `<var>`, then the file named by `<var>_FILE`, then `demo`.
fn load_key(var: &str, demo: &str) -> Result<KeyToken> {
    if let Ok(token) = std::env::var(var) {
        return KeyToken::from_token(&token).with_context(|| format!("{var} is not a valid key"));
    }

    let file_var = format!("{var}_FILE");
    if let Ok(path) = std::env::var(&file_var) {
        let token = zeroize::Zeroizing::new(
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?,
        );
        return KeyToken::from_token(&token).with_context(|| format!("{path} is not a valid key"));
    }

    tracing::warn!("{var} not set, using demo key");
    Ok(KeyToken::from_token(demo)?)
}

fn main() -> Result<ExitCode> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        return Ok(ExitCode::SUCCESS);
    };
    let _guard = init_logging()?;

    let mut config = DeviceConfig::load(args.config.as_deref())?;
    if let Some(indices) = args.indices {
        config.npi_indices = indices;
    }

    let keys = DeviceKeys::new(
        load_key("ROBOMEDITRUST_HOSPITAL_PUB_KEY", DEMO_HOSPITAL_PUB)?,
        load_key("ROBOMEDITRUST_ROBOT_PRIV_KEY", DEMO_ROBOT_PRIV)?,
    );
    tracing::info!(
        hospital = %keys.hospital_public.fingerprint,
        robot = %keys.robot_private.fingerprint,
        "Keys loaded"
    );

    let ports = DeviceCollaborators {
        diagnostics: Arc::new(SimulatedDiagnostics::new(config.self_check_delay())),
        patient: Arc::new(ConsolePatientInterface::new(config.patient_arrival())),
        sensors: Arc::new(SimulatedSensorArray::default()),
        inference: Arc::new(SimulatedInferenceEngine::new(
            keys.robot_private.fingerprint.clone(),
        )),
        transmitter: Arc::new(LoopbackTransmitter::new()),
        channel: Arc::new(SimulatedSecureChannel::new()),
    };

    let mut session = DeviceSession::new(config, keys, ports);
    match session.run_full_cycle(args.online)? {
        CycleOutcome::Transmitted {
            delivery,
            wire_bytes,
        } => match delivery {
            Delivery::Acknowledged { receipt } => {
                println!("Transmitted {wire_bytes} bytes, acknowledged ({receipt})");
            }
            Delivery::Rejected { reason } => {
                println!("Transmitted {wire_bytes} bytes, rejected by hospital: {reason}");
            }
        },
        CycleOutcome::Diagnosed(diagnosis) => {
            println!("Diagnosis: {}", diagnosis.label);
        }
        CycleOutcome::Aborted(reason) => {
            eprintln!("Cycle aborted: {reason}");
            return Ok(ExitCode::FAILURE);
        }
    }

    tracing::info!("RoboMediTrust shutdown complete.");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_defaults_to_online_without_overrides() {
        let args = parse(&[]).expect("parses").expect("runs");
        assert!(args.online);
        assert!(args.config.is_none());
        assert!(args.indices.is_none());
    }

    #[test]
    fn test_parses_indices_and_mode() {
        let args = parse(&["--offline", "--indices", "2,3,3,6"])
            .expect("parses")
            .expect("runs");
        assert!(!args.online);
        assert_eq!(args.indices, Some(vec![2, 3, 3, 6]));
    }

    #[test]
    fn test_missing_indices_value_rejected() {
        assert!(parse(&["--indices"]).is_err());
        assert!(parse(&["--indices", ""]).is_err());
        assert!(parse(&["--indices", "  "]).is_err());
        assert!(parse(&["--indices", "1,x"]).is_err());
    }

    #[test]
    fn test_missing_config_path_rejected() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }

    #[test]
    fn test_help_exits_without_running() {
        assert!(parse(&["--help"]).expect("parses").is_none());
    }
}
