//! Encryption codec for sensitive settings.
//!
//! AES-256-GCM with a random 16-byte IV per call. The stored envelope is
//! three colon-separated hex segments: IV, authentication tag, ciphertext.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// AES-256-GCM parameterized for the 16-byte nonce the envelope carries.
type EnvelopeCipher = AesGcm<Aes256, U16>;

/// IV length in bytes.
pub const IV_LEN: usize = 16;
/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Required key length in bytes.
pub const KEY_LEN: usize = 32;

/// Environment variable holding the settings key (exactly [`KEY_LEN`] bytes).
pub const KEY_ENV_VAR: &str = "SETTINGS_ENCRYPTION_KEY";

/// Codec errors. The `MissingKey`/`InvalidKeyLength` pair is a fatal
/// misconfiguration; `Decryption` covers malformed envelopes and
/// authentication failures and never falls back to returning ciphertext.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption key is missing ({KEY_ENV_VAR} is not set)")]
    MissingKey,

    #[error("Encryption key must be {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),
}

enum KeySource {
    Env(&'static str),
    Fixed(Zeroizing<Vec<u8>>),
}

/// Authenticated encryption for the sensitive-settings allow-list.
///
/// The key is resolved on every call, so a missing or mis-sized key surfaces
/// as a configuration error at first use rather than at startup.
pub struct SettingsCipher {
    source: KeySource,
}

impl SettingsCipher {
    /// Cipher keyed from [`KEY_ENV_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            source: KeySource::Env(KEY_ENV_VAR),
        }
    }

    /// Cipher keyed from an explicit byte string (tests, embedding hosts
    /// with their own secret management).
    #[must_use]
    pub fn with_key(key: impl Into<Vec<u8>>) -> Self {
        Self {
            source: KeySource::Fixed(Zeroizing::new(key.into())),
        }
    }

    fn load_key(&self) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let bytes = match &self.source {
            KeySource::Env(var) => Zeroizing::new(
                std::env::var(var)
                    .map_err(|_| CryptoError::MissingKey)?
                    .into_bytes(),
            ),
            KeySource::Fixed(key) => key.clone(),
        };
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKeyLength(bytes.len()));
        }
        Ok(bytes)
    }

    /// Encrypt a plaintext into an `iv:tag:ciphertext` hex envelope.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let key = self.load_key()?;
        let cipher = EnvelopeCipher::new_from_slice(&key)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let sealed = cipher
            .encrypt(Nonce::<U16>::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| CryptoError::Encryption("AEAD encryption failed".to_string()))?;

        // aes-gcm appends the tag to the ciphertext; the envelope stores it
        // as its own segment.
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        Ok(format!(
            "{}:{}:{}",
            hex::encode(iv),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    /// Decrypt an `iv:tag:ciphertext` hex envelope back to its plaintext.
    pub fn decrypt(&self, envelope: &str) -> Result<String, CryptoError> {
        let key = self.load_key()?;

        let parts: Vec<&str> = envelope.split(':').collect();
        if parts.len() != 3 {
            return Err(CryptoError::Decryption(
                "invalid envelope format, expected iv:tag:ciphertext".to_string(),
            ));
        }

        let iv = hex::decode(parts[0])
            .map_err(|e| CryptoError::Decryption(format!("invalid IV hex: {e}")))?;
        let tag = hex::decode(parts[1])
            .map_err(|e| CryptoError::Decryption(format!("invalid tag hex: {e}")))?;
        let mut sealed = hex::decode(parts[2])
            .map_err(|e| CryptoError::Decryption(format!("invalid ciphertext hex: {e}")))?;

        if iv.len() != IV_LEN {
            return Err(CryptoError::Decryption(format!(
                "invalid IV length, expected {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }
        if tag.len() != TAG_LEN {
            return Err(CryptoError::Decryption(format!(
                "invalid tag length, expected {TAG_LEN} bytes, got {}",
                tag.len()
            )));
        }

        let cipher = EnvelopeCipher::new_from_slice(&key)
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;
        sealed.extend_from_slice(&tag);

        let plaintext = cipher
            .decrypt(Nonce::<U16>::from_slice(&iv), sealed.as_slice())
            .map_err(|_| {
                CryptoError::Decryption(
                    "authentication failed (wrong key or tampered data)".to_string(),
                )
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {e}")))
    }
}
