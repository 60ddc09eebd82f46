//! Hybride Nachrichten-Verschluesselung
//!
//! Verschluesselt eine einzelne Nachricht fuer einen Empfaenger:
//! AES-256-GCM fuer den Inhalt, RSA-OAEP(SHA-256) fuer den Schluessel.
//!
//! ## Ablauf
//! 1. Frischer 256-Bit AES-Schluessel und frische 96-Bit Nonce pro Aufruf
//! 2. Nachricht mit AES-256-GCM verschluesseln (Auth-Tag angehaengt)
//! 3. AES-Schluessel mit dem oeffentlichen Schluessel des Empfaengers einwickeln
//! 4. Umschlag {Ciphertext, eingewickelter Schluessel, Nonce} transport-kodieren

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};
use crate::types::{EncryptedEnvelope, SecretBytes, NONCE_BYTES};

/// Laenge des symmetrischen Nachrichten-Schluessels (AES-256)
pub const AES_KEY_BYTES: usize = 32;

/// Verschluesselt eine Nachricht fuer einen Empfaenger
///
/// Gibt den transport-kodierten Umschlag zurueck. Zwei Aufrufe mit
/// identischer Nachricht und identischem Empfaenger erzeugen nie denselben
/// Umschlag; Schluessel und Nonce werden pro Aufruf neu gezogen.
pub fn encrypt_message(plaintext: &str, recipient_public_key_pem: &str) -> CryptoResult<String> {
    let recipient_key = RsaPublicKey::from_public_key_pem(recipient_public_key_pem)
        .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?;

    let mut key_bytes = vec![0u8; AES_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut key_bytes)
        .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
    let aes_key = SecretBytes::new(key_bytes);

    let mut nonce = [0u8; NONCE_BYTES];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(aes_key.as_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    let wrapped_key = recipient_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), aes_key.as_bytes())
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    Ok(EncryptedEnvelope {
        ciphertext,
        wrapped_key,
        nonce,
    }
    .to_transport())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::generate_key_pair;
    use crate::types::AUTH_TAG_BYTES;

    #[test]
    fn envelope_hat_gueltige_struktur() {
        let pair = generate_key_pair().unwrap();
        let transport = encrypt_message("Hallo Rendezvous", &pair.public_key_pem).unwrap();

        let envelope = EncryptedEnvelope::from_transport(&transport).unwrap();
        // GCM: Ciphertext = Klartext + 16 Bytes Auth-Tag
        assert_eq!(
            envelope.ciphertext.len(),
            "Hallo Rendezvous".len() + AUTH_TAG_BYTES
        );
        // RSA-2048: eingewickelter Schluessel ist genau ein Modulus-Block
        assert_eq!(envelope.wrapped_key.len(), 256);
    }

    #[test]
    fn zwei_aufrufe_erzeugen_verschiedene_umschlaege() {
        let pair = generate_key_pair().unwrap();
        let t1 = encrypt_message("gleicher Text", &pair.public_key_pem).unwrap();
        let t2 = encrypt_message("gleicher Text", &pair.public_key_pem).unwrap();
        assert_ne!(t1, t2);

        let e1 = EncryptedEnvelope::from_transport(&t1).unwrap();
        let e2 = EncryptedEnvelope::from_transport(&t2).unwrap();
        assert_ne!(e1.ciphertext, e2.ciphertext);
        assert_ne!(e1.wrapped_key, e2.wrapped_key);
        assert_ne!(e1.nonce, e2.nonce);
    }

    #[test]
    fn ungueltiger_empfaenger_schluessel_schlaegt_fehl() {
        let result = encrypt_message("Text", "kein gueltiges PEM");
        assert!(matches!(result, Err(CryptoError::UngueltigerSchluessel(_))));
    }

    #[test]
    fn leere_nachricht_verschluesselbar() {
        let pair = generate_key_pair().unwrap();
        let transport = encrypt_message("", &pair.public_key_pem).unwrap();
        let envelope = EncryptedEnvelope::from_transport(&transport).unwrap();
        assert_eq!(envelope.ciphertext.len(), AUTH_TAG_BYTES);
    }
}
