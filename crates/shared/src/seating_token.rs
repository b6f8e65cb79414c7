//! Opaque tokens for seating request targets.
//!
//! Invitee identifiers are never exposed to public clients directly. Each id is
//! sealed with AES-256-GCM under a synthetic nonce derived from the plaintext
//! with HMAC-SHA256, so the same id always produces the same token while a
//! modified token fails to open.
//!
//! Format: base64url(nonce_12bytes || ciphertext || tag_16bytes), unpadded.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Required length of the configured secret, in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

const ENCRYPTION_LABEL: &[u8] = b"capacious.seating-token.encryption";
const NONCE_LABEL: &[u8] = b"capacious.seating-token.nonce";

/// Error type for token operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token key: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid token encoding")]
    InvalidEncoding,

    #[error("Token is too short")]
    TooShort,

    #[error("Failed to seal token")]
    EncryptionFailed,

    #[error("Failed to open token (wrong key or tampered data)")]
    DecryptionFailed,

    #[error("Token payload is not valid UTF-8")]
    InvalidPayload,

    #[error("Token does not carry a valid identifier")]
    InvalidIdentifier,
}

/// Seals and opens seating request target identifiers.
///
/// Constructed once at startup from configuration and shared read-only.
#[derive(Clone)]
pub struct SeatingTokenCodec {
    encryption_key: [u8; KEY_LEN],
    nonce_key: [u8; KEY_LEN],
}

impl std::fmt::Debug for SeatingTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatingTokenCodec")
            .field("encryption_key", &"[REDACTED]")
            .field("nonce_key", &"[REDACTED]")
            .finish()
    }
}

impl SeatingTokenCodec {
    /// Creates a codec from the configured secret.
    ///
    /// The secret must be exactly [`KEY_LEN`] bytes. Separate encryption and
    /// nonce keys are derived from it so neither primitive reuses the other's key.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() != KEY_LEN {
            return Err(TokenError::InvalidKeyLength(secret.len()));
        }

        Ok(Self {
            encryption_key: derive_key(secret, ENCRYPTION_LABEL)?,
            nonce_key: derive_key(secret, NONCE_LABEL)?,
        })
    }

    /// Seals a plaintext identifier into a URL-safe token.
    pub fn encrypt(&self, plain: &str) -> Result<String, TokenError> {
        let nonce_bytes = self.synthetic_nonce(plain.as_bytes())?;
        let cipher = self.cipher()?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plain.as_bytes())
            .map_err(|_| TokenError::EncryptionFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Opens a token produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, token: &str) -> Result<String, TokenError> {
        let sealed = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| TokenError::InvalidEncoding)?;

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(TokenError::TooShort);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let plain = self
            .cipher()?
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| TokenError::DecryptionFailed)?;

        // A valid tag under a nonce we would never have chosen means the token
        // was not produced by this codec.
        if self.synthetic_nonce(&plain)?.as_slice() != nonce_bytes {
            return Err(TokenError::DecryptionFailed);
        }

        String::from_utf8(plain).map_err(|_| TokenError::InvalidPayload)
    }

    /// Seals an invitee id.
    pub fn encrypt_id(&self, id: Uuid) -> Result<String, TokenError> {
        self.encrypt(&id.to_string())
    }

    /// Opens a token and parses the invitee id it carries.
    pub fn decrypt_id(&self, token: &str) -> Result<Uuid, TokenError> {
        let plain = self.decrypt(token)?;
        Uuid::parse_str(&plain).map_err(|_| TokenError::InvalidIdentifier)
    }

    fn cipher(&self) -> Result<Aes256Gcm, TokenError> {
        Aes256Gcm::new_from_slice(&self.encryption_key)
            .map_err(|_| TokenError::InvalidKeyLength(self.encryption_key.len()))
    }

    fn synthetic_nonce(&self, plain: &[u8]) -> Result<[u8; NONCE_LEN], TokenError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.nonce_key)
            .map_err(|_| TokenError::InvalidKeyLength(self.nonce_key.len()))?;
        mac.update(plain);
        let digest = mac.finalize().into_bytes();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        Ok(nonce)
    }
}

fn derive_key(secret: &[u8], label: &[u8]) -> Result<[u8; KEY_LEN], TokenError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret)
        .map_err(|_| TokenError::InvalidKeyLength(secret.len()))?;
    mac.update(label);

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&mac.finalize().into_bytes());
    Ok(key)
}
