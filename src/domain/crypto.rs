//! Key tokens and ciphertext envelopes used by the secure channel.
//!
//! # Memory Security
//!
//! `KeyToken` implements `Zeroize` and `ZeroizeOnDrop` so key material is
//! erased when dropped, and its `Debug` output only shows a fingerprint.

use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Error type for key and ciphertext handling.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Opaque key token (hospital public key or robot private key).
///
/// The format is unspecified; anything convertible to bytes is accepted.
///
/// # Security
///
/// - Implements `ZeroizeOnDrop`: key material is erased when dropped
/// - `Debug` implementation does NOT expose key bytes
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyToken {
    inner: Vec<u8>,

    /// Key fingerprint for identification (NOT secret)
    #[zeroize(skip)]
    pub fingerprint: String,
}

impl KeyToken {
    /// Create a key token from raw bytes.
    ///
    /// # Errors
    /// Returns `CryptoError::InvalidKeyFormat` if `bytes` is empty.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::InvalidKeyFormat("key token is empty".into()));
        }
        let fingerprint = compute_fingerprint(&bytes);
        Ok(Self {
            inner: bytes,
            fingerprint,
        })
    }

    /// Create a key token from its textual form (e.g. `HOSP_PUB_123`).
    ///
    /// Surrounding whitespace is ignored so tokens read from files work as-is.
    ///
    /// # Errors
    /// Returns `CryptoError::InvalidKeyFormat` if the token is blank.
    pub fn from_token(token: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(token.trim().as_bytes().to_vec())
    }

    /// Get the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl std::fmt::Debug for KeyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyToken")
            .field("fingerprint", &self.fingerprint)
            .field("size_bytes", &self.inner.len())
            .finish()
    }
}

/// Key material supplied when a device session is constructed.
#[derive(Debug, Clone)]
pub struct DeviceKeys {
    /// Recipient key for payloads sent to the hospital network
    pub hospital_public: KeyToken,
    /// Key used to open results of local secure inference
    pub robot_private: KeyToken,
}

impl DeviceKeys {
    pub fn new(hospital_public: KeyToken, robot_private: KeyToken) -> Self {
        Self {
            hospital_public,
            robot_private,
        }
    }
}

/// Discriminant carried by every ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiphertextTag {
    /// Produced by the secure channel (or a collaborator sealing on its behalf)
    Sealed,
    /// Bytes that never passed through the secure channel
    Raw,
}

/// Ciphertext envelope.
///
/// The stub channel does not provide confidentiality: `body` holds the
/// payload as given. The envelope shape is what collaborators rely on.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub tag: CiphertextTag,

    /// Fingerprint of the key the payload was sealed for
    pub recipient_fingerprint: String,

    #[serde(with = "body_b64")]
    body: Vec<u8>,
}

impl Ciphertext {
    /// Wrap a payload sealed for `recipient_fingerprint`.
    pub fn sealed(body: Vec<u8>, recipient_fingerprint: impl Into<String>) -> Self {
        Self {
            tag: CiphertextTag::Sealed,
            recipient_fingerprint: recipient_fingerprint.into(),
            body,
        }
    }

    /// Wrap bytes that carry no channel tag.
    pub fn raw(body: Vec<u8>) -> Self {
        Self {
            tag: CiphertextTag::Raw,
            recipient_fingerprint: String::new(),
            body,
        }
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.tag == CiphertextTag::Sealed
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the size of the body in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.body.len()
    }

    /// Bounded, lossy preview of the body for narration and debugging.
    ///
    /// Not part of the data contract: callers must not parse it.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let mut chars = text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Serialize to the JSON wire form (body base64-encoded).
    ///
    /// # Errors
    /// Returns `CryptoError::Serialization` if encoding fails.
    pub fn to_wire(&self) -> Result<Vec<u8>, CryptoError> {
        serde_json::to_vec(self).map_err(|e| CryptoError::Serialization(e.to_string()))
    }

    /// Parse the JSON wire form.
    ///
    /// # Errors
    /// Returns `CryptoError::Serialization` if the bytes are not a valid envelope.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, CryptoError> {
        serde_json::from_slice(bytes).map_err(|e| CryptoError::Serialization(e.to_string()))
    }
}

impl std::fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ciphertext")
            .field("tag", &self.tag)
            .field("recipient_fingerprint", &self.recipient_fingerprint)
            .field("size_bytes", &self.body.len())
            .finish()
    }
}

mod body_b64 {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Compute a fingerprint for key identification using SHA-256.
///
/// First 8 bytes of the digest, hex encoded.
pub fn compute_fingerprint(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(bytes);
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

/// Encode raw key bytes the way `generate_device_keys` writes them.
#[must_use]
pub fn encode_key_b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
