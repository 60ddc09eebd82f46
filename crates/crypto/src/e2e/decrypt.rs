//! Hybride Nachrichten-Entschluesselung
//!
//! Entschluesselt einen transport-kodierten Umschlag mit dem privaten
//! Schluessel des Empfaengers. Schlaegt geschlossen fehl: beschaedigte,
//! manipulierte oder fremde Eingaben liefern nie Klartext, auch nicht
//! teilweise.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;

use crate::e2e::encrypt::AES_KEY_BYTES;
use crate::error::{CryptoError, CryptoResult};
use crate::types::{EncryptedEnvelope, SecretBytes};

/// Entschluesselt einen transport-kodierten Umschlag
///
/// Reihenfolge: Umschlag dekodieren und validieren, AES-Schluessel
/// auswickeln, Inhalt entschluesseln und Auth-Tag pruefen. Jede Stufe
/// bricht mit ihrem Fehler ab, bevor die naechste laeuft.
pub fn decrypt_message(transport: &str, recipient_private_key_pem: &str) -> CryptoResult<String> {
    let envelope = EncryptedEnvelope::from_transport(transport)?;

    let private_key = RsaPrivateKey::from_pkcs8_pem(recipient_private_key_pem)
        .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?;

    // Bei fehlgeschlagenem Auswickeln laeuft der symmetrische Schritt
    // trotzdem, gegen einen Zufallsschluessel: beide Fehlerpfade zeigen
    // dasselbe Zeitverhalten.
    let aes_key = match private_key.decrypt(Oaep::new::<Sha256>(), &envelope.wrapped_key) {
        Ok(bytes) if bytes.len() == AES_KEY_BYTES => SecretBytes::new(bytes),
        _ => {
            let mut dummy = vec![0u8; AES_KEY_BYTES];
            OsRng.fill_bytes(&mut dummy);
            let _ = aes_decrypt(&envelope, &dummy);
            return Err(CryptoError::SchluesselAuswickeln);
        }
    };

    let plaintext = aes_decrypt(&envelope, aes_key.as_bytes())?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::Entschluesselung)
}

fn aes_decrypt(envelope: &EncryptedEnvelope, key_bytes: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes));
    cipher
        .decrypt(
            Nonce::from_slice(&envelope.nonce),
            envelope.ciphertext.as_slice(),
        )
        .map_err(|_| CryptoError::Entschluesselung)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
