//! In-process reference wrapper: AES-256-GCM with HKDF-SHA256 derivation

use super::Wrapper;
use crate::error::{Error, Result};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use async_trait::async_trait;
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Root key size (AES-256)
pub const KEY_SIZE: usize = 32;

/// Nonce size for AES-GCM
pub const NONCE_SIZE: usize = 12;

/// Root key material, zeroized on drop so it never lingers in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
struct RootKey([u8; KEY_SIZE]);

/// Envelope-encryption wrapper backed by a single in-memory root key.
///
/// Envelope layout: fresh random nonce prepended to the AES-256-GCM
/// ciphertext. Derivation is HKDF-SHA256 over the root key, so it is
/// deterministic in `(root key, salt, info)`. Immutable after
/// construction and safe to share across concurrent calls.
pub struct AeadWrapper {
    root_key: RootKey,
}

impl AeadWrapper {
    /// Create a wrapper with a fresh random root key.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self {
            root_key: RootKey(key),
        }
    }

    /// Create a wrapper around existing root key material.
    pub fn from_key(key: [u8; KEY_SIZE]) -> Self {
        Self {
            root_key: RootKey(key),
        }
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.root_key.0)
            .map_err(|e| Error::Crypto(format!("failed to create cipher: {}", e)))
    }
}

#[async_trait]
impl Wrapper for AeadWrapper {
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = self.cipher()?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| Error::Crypto(format!("encryption failed: {}", e)))?;

        // Prepend nonce so the envelope is self-contained.
        let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);

        Ok(envelope)
    }

    async fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>> {
        if envelope.len() < NONCE_SIZE {
            return Err(Error::Crypto("envelope too short".to_string()));
        }

        let cipher = self.cipher()?;
        let nonce = Nonce::from_slice(&envelope[..NONCE_SIZE]);
        let ciphertext = &envelope[NONCE_SIZE..];

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| Error::Crypto(format!("decryption failed: {}", e)))
    }

    async fn derive(&self, len: usize, salt: &[u8], info: &[u8]) -> Result<Vec<u8>> {
        let hkdf = Hkdf::<Sha256>::new(Some(salt), &self.root_key.0);
        let mut okm = vec![0u8; len];
        hkdf.expand(info, &mut okm)
            .map_err(|e| Error::Crypto(format!("derivation failed: {}", e)))?;
        Ok(okm)
    }
}
