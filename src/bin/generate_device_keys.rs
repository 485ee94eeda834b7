//! Device key provisioning utility.
//!
//! Generates a random hospital public token and robot private token:
//! - Robot private token written with 0600 permissions
//! - Hospital public token written with 0644 permissions
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_device_keys -- --out-priv <path> --out-pub <path> [--force]
//! ```
//!
//! Point `ROBOMEDITRUST_ROBOT_PRIV_KEY_FILE` and
//! `ROBOMEDITRUST_HOSPITAL_PUB_KEY_FILE` at the written files.

use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use robomeditrust::domain::{compute_fingerprint, encode_key_b64};

const USAGE: &str = "Usage: generate_device_keys --out-priv <path> --out-pub <path> [--force]";

const TOKEN_BYTES: usize = 32;

fn write_token(path: &Path, token: &str, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        opts.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = opts
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(token.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut out_priv: Option<PathBuf> = None;
    let mut out_pub: Option<PathBuf> = None;
    let mut force = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-priv" | "--out-pub" => {
                let p = args.next().unwrap_or_default();
                if p.is_empty() {
                    bail!("{arg} needs a path\n{USAGE}");
                }
                if arg == "--out-priv" {
                    out_priv = Some(PathBuf::from(p));
                } else {
                    out_pub = Some(PathBuf::from(p));
                }
            }
            "--force" => force = true,
            "-h" | "--help" => {
                println!("{USAGE}\n\nWrites base64 key tokens for the intake unit. Prints only fingerprints.");
                return Ok(());
            }
            _ => bail!("Unknown arg: {arg}\n{USAGE}"),
        }
    }

    let (Some(out_priv), Some(out_pub)) = (out_priv, out_pub) else {
        bail!(USAGE);
    };

    for path in [&out_priv, &out_pub] {
        if path.exists() && !force {
            bail!(
                "Refusing to overwrite existing file {}. Use --force.",
                path.display()
            );
        }
    }

    let mut priv_bytes = [0u8; TOKEN_BYTES];
    let mut pub_bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut priv_bytes);
    OsRng.fill_bytes(&mut pub_bytes);

    let priv_token = Zeroizing::new(encode_key_b64(&priv_bytes));
    let pub_token = encode_key_b64(&pub_bytes);
    priv_bytes.zeroize();

    write_token(&out_priv, &priv_token, 0o600)?;
    write_token(&out_pub, &pub_token, 0o644)?;

    // Fingerprints match what the device logs at startup.
    println!("Wrote robot private token to {}", out_priv.display());
    println!("Wrote hospital public token to {}", out_pub.display());
    println!(
        "ROBOT_PRIV fingerprint={}",
        compute_fingerprint(priv_token.as_bytes())
    );
    println!(
        "HOSP_PUB fingerprint={}",
        compute_fingerprint(pub_token.as_bytes())
    );

    Ok(())
}
