//! Log sanitization for device payloads and key material.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before reaching
//! the sink. The following are redacted:
//! - Nucleotide payloads (encoded or perturbed readings)
//! - Demo and provisioned key tokens, contextual secrets, long hex/base64 keys
//! - Raw vital-sign dumps such as `age=52` or `'chol': 212`
//!
//! Key fingerprints (16 hex chars) and visit ids are left intact so sessions
//! stay traceable.
//!
//! Input is capped at `ROBOMEDITRUST_SANITIZE_MAX_BYTES` (default 16 KiB);
//! anything past the cap is dropped and marked `[TRUNCATED]`.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

static RULES: OnceLock<Rules> = OnceLock::new();

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Rules {
    any: RegexSet,
    ordered: Vec<Rule>,
}

/// Patterns in application order. Vitals run before the generic secret rules
/// so `chol=212` is not mistaken for anything else.
///
/// Payload and key rules open with a captured boundary instead of `\b`: an
/// ANSI colour code such as `ESC[0m` leaves no word boundary before the
/// value it wraps. The boundary is written back through `${1}`.
const PATTERNS: [(&str, &str); 7] = [
    (
        r"(^|[^A-Za-z0-9]|\x1b\[[0-9;]*m)[ACGTX]{12,}\b",
        "${1}[REDACTED-NLD]",
    ),
    (
        r#"(?i)['"]?\b(?:age|sex|cp|trestbps|chol|fbs|restecg|thalach|exang|oldpeak|slope|ca|thal)\b['"]?\s*[:=]\s*-?\d+(?:\.\d+)?"#,
        "[REDACTED-VITAL]",
    ),
    (r"\b(?:HOSP|ROBOT)_(?:PUB|PRIV)_[A-Za-z0-9]+\b", "[REDACTED-KEY-TOKEN]"),
    (
        r"(?i)\b(?:private[_-]?key|priv[_-]?key|secret|token|seed)\b\s*[:=]\s*\S+",
        "[REDACTED-SECRET]",
    ),
    (
        r"(?s)-----BEGIN [A-Z ]{0,40}PRIVATE KEY-----.*?-----END [A-Z ]{0,40}PRIVATE KEY-----",
        "[REDACTED-PEM]",
    ),
    (
        r"(^|[^A-Za-z0-9+/]|\x1b\[[0-9;]*m)[A-Za-z0-9+/]{40,}={0,2}",
        "${1}[REDACTED-KEY]",
    ),
    (
        r"(^|[^A-Za-z0-9]|\x1b\[[0-9;]*m)[0-9a-fA-F]{32,}\b",
        "${1}[REDACTED-KEY]",
    ),
];

fn rules() -> &'static Rules {
    RULES.get_or_init(|| {
        // Patterns are constants exercised by the tests below.
        let any = RegexSet::new(PATTERNS.iter().map(|(p, _)| *p)).expect("valid pattern set");
        let ordered = PATTERNS
            .iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("valid pattern"),
                replacement,
            })
            .collect();
        Rules { any, ordered }
    })
}

fn max_sanitize_bytes() -> usize {
    std::env::var("ROBOMEDITRUST_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact payloads, keys and vitals from `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let rules = rules();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let hits = rules.any.matches(prefix);
    let mut out = prefix.to_string();
    if hits.matched_any() {
        for idx in hits.iter() {
            let rule = &rules.ordered[idx];
            out = rule.regex.replace_all(&out, rule.replacement).into_owned();
        }
    }

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// Check whether `input` holds anything [`sanitize`] would redact.
#[must_use]
pub fn contains_sensitive(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    rules().any.is_match(prefix)
}

/// `MakeWriter` wrapper that sanitizes each formatted log line.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn drain_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);

        // A formatter that never writes a newline must not grow the buffer forever.
        if self.pending.len() > max_sanitize_bytes().saturating_mul(2) {
            let all = std::mem::take(&mut self.pending);
            self.emit(&all)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.drain_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_redacts_nucleotide_payload() {
        let out = sanitize("payload AAACCGAACTTTXXXGGA sealed");
        assert!(out.contains("[REDACTED-NLD]"));
        assert!(!out.contains("AAACCGAAC"));
    }

    #[test]
    fn test_short_nucleotide_words_kept() {
        assert_eq!(sanitize("swap ACGT"), "swap ACGT");
    }

    #[test]
    fn test_redacts_demo_key_tokens() {
        let out = sanitize("keys HOSP_PUB_123 and ROBOT_PRIV_456");
        assert!(!out.contains("HOSP_PUB_123"));
        assert!(!out.contains("ROBOT_PRIV_456"));
        assert_eq!(out.matches("[REDACTED-KEY-TOKEN]").count(), 2);
    }

    #[test]
    fn test_redacts_vital_dump() {
        let out = sanitize("Raw data collected: {'age': 52, 'chol': 212, 'oldpeak': 1.0}");
        assert!(!out.contains("52"));
        assert!(!out.contains("212"));
        assert!(out.contains("[REDACTED-VITAL]"));
    }

    #[test]
    fn test_redacts_contextual_secret() {
        let out = sanitize("private_key=c2VjcmV0LXNlZWQ");
        assert!(out.contains("[REDACTED-SECRET]"));
        assert!(!out.contains("c2VjcmV0"));
    }

    #[test]
    fn test_keeps_fingerprints() {
        let line = "recipient=0123456789abcdef state=transmitting";
        assert_eq!(sanitize(line), line);
        assert!(!contains_sensitive(line));
    }

    #[test]
    fn test_redacts_long_hex() {
        let out = sanitize("blob 0123456789abcdef0123456789abcdef");
        assert!(out.contains("[REDACTED-KEY]"));
    }

    #[test]
    fn test_redacts_payload_behind_ansi_colour() {
        let line = "\x1b[3mpreview\x1b[0m\x1b[2m=\x1b[0mAAACCGAACTTTXXXGGAAC...";
        let out = sanitize(line);
        assert!(!out.contains("AAACCGAAC"));
        assert!(out.contains("\x1b[0m[REDACTED-NLD]..."));
        assert!(contains_sensitive(line));
    }

    #[test]
    fn test_ansi_codes_survive_key_redaction() {
        let key = "c2VjcmV0LXNlZWQtbWF0ZXJpYWwtZm9yLXRoZS1yb2JvdA==";
        let out = sanitize(&format!("seed\x1b[2m=\x1b[0m{key} done"));
        assert_eq!(out, "seed\x1b[2m=\x1b[0m[REDACTED-KEY] done");

        let hex = "0123456789abcdef0123456789abcdef";
        let out = sanitize(&format!("blob=\x1b[0m{hex}"));
        assert_eq!(out, "blob=\x1b[0m[REDACTED-KEY]");
    }

    #[test]
    fn test_truncates_large_inputs() {
        let out = sanitize_with_limit("prefix ACGTACGTACGTACGT suffix", 10);
        assert!(out.ends_with("[TRUNCATED]"));
        assert!(!out.contains("suffix"));
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let mut sink = Vec::new();
        {
            let mut writer = SanitizingWriter {
                inner: &mut sink,
                pending: Vec::new(),
            };
            writer.write_all(b"sent ACCAAGAACTTTGGG\npartial ROBOT_PRIV_").expect("write");
            writer.write_all(b"456").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(sink).expect("utf8");
        assert!(text.contains("sent [REDACTED-NLD]\n"));
        assert!(text.contains("partial [REDACTED-KEY-TOKEN]"));
    }
}
