//! # Standalone encryption-envelope utility
//!
//! The reference HAN implementation this crate is built from is plaintext:
//! no meter observed in the field wraps its APDU in a DLMS/COSEM security
//! envelope. This module exists for callers on a different HAN profile
//! that do — it decrypts the `general-glo-ciphering` envelope (system
//! title + invocation counter as the GCM nonce, 128-bit authentication
//! tag) using AES-128-GCM, and is never called from [`crate::Decoder`].
//! Plaintext recovered here is handed to the pipeline the same way any
//! other byte source is: through [`crate::ByteSource`].

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Key};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("system title must be 8 octets, got {0}")]
    InvalidSystemTitle(usize),

    #[error("AES key must be 16 octets, got {0}")]
    InvalidKeyLength(usize),

    #[error("authentication failed: ciphertext or tag does not match the expected envelope")]
    AuthenticationFailed,
}

/// Decrypts an APDU wrapped in a `general-glo-ciphering` envelope in place.
///
/// `system_title` (8 octets) and `invocation_counter` build the 12-octet
/// GCM nonce per the DLMS Green Book (system title || big-endian
/// invocation counter); `key` is the 16-octet AES-128 key for this meter's
/// association; `ciphertext` is mutated to the recovered plaintext on
/// success.
pub fn decrypt_apdu(
    system_title: &[u8],
    invocation_counter: u32,
    key: &[u8],
    ciphertext: &mut Vec<u8>,
) -> Result<(), CryptoError> {
    if system_title.len() != 8 {
        return Err(CryptoError::InvalidSystemTitle(system_title.len()));
    }
    if key.len() != 16 {
        return Err(CryptoError::InvalidKeyLength(key.len()));
    }

    let mut nonce = [0u8; 12];
    nonce[..8].copy_from_slice(system_title);
    nonce[8..].copy_from_slice(&invocation_counter.to_be_bytes());

    let key = Key::<Aes128Gcm>::from_slice(key);
    let cipher = Aes128Gcm::new(key);
    cipher
        .decrypt_in_place(&nonce.into(), &[], ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_gcm::aead::Aead;

    #[test]
    fn round_trips_through_encrypt_then_decrypt() {
        let system_title = [0x4Bu8, 0x46, 0x4D, 0x10, 0x20, 0x01, 0x12, 0xA9];
        let key_bytes = [0x11u8; 16];
        let invocation_counter = 1u32;

        let mut nonce = [0u8; 12];
        nonce[..8].copy_from_slice(&system_title);
        nonce[8..].copy_from_slice(&invocation_counter.to_be_bytes());

        let key = Key::<Aes128Gcm>::from_slice(&key_bytes);
        let cipher = Aes128Gcm::new(key);
        let mut ciphertext = cipher
            .encrypt(&nonce.into(), b"hello cosem".as_slice())
            .unwrap();

        decrypt_apdu(&system_title, invocation_counter, &key_bytes, &mut ciphertext).unwrap();
        assert_eq!(ciphertext, b"hello cosem");
    }

    #[test]
    fn rejects_wrong_system_title_length() {
        let mut ciphertext = vec![0u8; 16];
        let err = decrypt_apdu(&[0u8; 7], 1, &[0u8; 16], &mut ciphertext).unwrap_err();
        assert_eq!(err, CryptoError::InvalidSystemTitle(7));
    }

    #[test]
    fn rejects_wrong_key_length() {
        let mut ciphertext = vec![0u8; 16];
        let err = decrypt_apdu(&[0u8; 8], 1, &[0u8; 10], &mut ciphertext).unwrap_err();
        assert_eq!(err, CryptoError::InvalidKeyLength(10));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let system_title = [0u8; 8];
        let key_bytes = [0x22u8; 16];
        let mut nonce = [0u8; 12];
        nonce[..8].copy_from_slice(&system_title);
        nonce[8..].copy_from_slice(&1u32.to_be_bytes());

        let key = Key::<Aes128Gcm>::from_slice(&key_bytes);
        let cipher = Aes128Gcm::new(key);
        let mut ciphertext = cipher.encrypt(&nonce.into(), b"plaintext".as_slice()).unwrap();
        ciphertext[0] ^= 0xFF;

        let err = decrypt_apdu(&system_title, 1, &key_bytes, &mut ciphertext).unwrap_err();
        assert_eq!(err, CryptoError::AuthenticationFailed);
    }
}
