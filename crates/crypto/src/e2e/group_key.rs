//! Gruppen-Schluessel-Primitiven
//!
//! Ein Raum hat genau einen symmetrischen 256-Bit Schluessel. Er wird fuer
//! jedes Mitglied einzeln mit dessen oeffentlichem RSA-Schluessel
//! eingewickelt (RSA-OAEP mit SHA-256); nur der Besitzer des passenden
//! privaten Schluessels kann ihn auswickeln. Der rohe Schluessel verlaesst
//! den erzeugenden Prozess nie.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};
use crate::types::{GroupKey, SecretBytes, WrappedGroupKey};

/// Laenge des Gruppen-Schluessels in Bytes
pub const GROUP_KEY_BYTES: usize = 32;

/// Erstellt einen frischen Gruppen-Schluessel (256 Bit Zufall)
pub fn create_group_key() -> CryptoResult<GroupKey> {
    let mut key_bytes = vec![0u8; GROUP_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut key_bytes)
        .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
    Ok(GroupKey {
        key_bytes: SecretBytes::new(key_bytes),
    })
}

/// Wickelt den Gruppen-Schluessel fuer ein Mitglied ein
///
/// Direkte RSA-OAEP-Verschluesselung der rohen Schluessel-Bytes,
/// Base64-kodiert fuer Persistenz und Transport.
pub fn wrap_group_key(
    group_key: &GroupKey,
    member_public_key_pem: &str,
) -> CryptoResult<WrappedGroupKey> {
    let public_key = RsaPublicKey::from_public_key_pem(member_public_key_pem)
        .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?;

    let wrapped = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), group_key.as_bytes())
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    Ok(WrappedGroupKey::new(BASE64.encode(wrapped)))
}

/// Wickelt einen Gruppen-Schluessel mit dem eigenen privaten Schluessel aus
pub fn unwrap_group_key(
    wrapped: &WrappedGroupKey,
    member_private_key_pem: &str,
) -> CryptoResult<GroupKey> {
    let private_key = RsaPrivateKey::from_pkcs8_pem(member_private_key_pem)
        .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?;

    let blob = BASE64
        .decode(wrapped.as_str())
        .map_err(|_| CryptoError::SchluesselAuswickeln)?;

    let key_bytes = private_key
        .decrypt(Oaep::new::<Sha256>(), &blob)
        .map_err(|_| CryptoError::SchluesselAuswickeln)?;

    if key_bytes.len() != GROUP_KEY_BYTES {
        return Err(CryptoError::SchluesselAuswickeln);
    }

    Ok(GroupKey {
        key_bytes: SecretBytes::new(key_bytes),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::generate_key_pair;

    #[test]
    fn group_key_erstellen() {
        let key = create_group_key().unwrap();
        assert_eq!(key.as_bytes().len(), GROUP_KEY_BYTES);
    }

    #[test]
    fn group_keys_sind_einzigartig() {
        let key1 = create_group_key().unwrap();
        let key2 = create_group_key().unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn wrap_und_unwrap_roundtrip() {
        let pair = generate_key_pair().unwrap();
        let key = create_group_key().unwrap();

        let wrapped = wrap_group_key(&key, &pair.public_key_pem).unwrap();
        let unwrapped = unwrap_group_key(&wrapped, &pair.private_key_pem).unwrap();

        assert_eq!(unwrapped.as_bytes(), key.as_bytes());
    }

    #[test]
    fn wrapped_key_ist_nicht_der_rohe_schluessel() {
        let pair = generate_key_pair().unwrap();
        let key = create_group_key().unwrap();

        let wrapped = wrap_group_key(&key, &pair.public_key_pem).unwrap();
        let blob = BASE64.decode(wrapped.as_str()).unwrap();
        // RSA-2048-Block, nicht die 32 rohen Bytes
        assert_eq!(blob.len(), 256);
    }

    #[test]
    fn falscher_private_key_schlaegt_fehl() {
        let pair = generate_key_pair().unwrap();
        let fremd = generate_key_pair().unwrap();
        let key = create_group_key().unwrap();

        let wrapped = wrap_group_key(&key, &pair.public_key_pem).unwrap();
        let result = unwrap_group_key(&wrapped, &fremd.private_key_pem);
        assert!(matches!(result, Err(CryptoError::SchluesselAuswickeln)));
    }

    #[test]
    fn manipulierter_blob_schlaegt_fehl() {
        let pair = generate_key_pair().unwrap();
        let key = create_group_key().unwrap();

        let wrapped = wrap_group_key(&key, &pair.public_key_pem).unwrap();
        let mut blob = BASE64.decode(wrapped.as_str()).unwrap();
        blob[10] ^= 0xFF;
        let manipuliert = WrappedGroupKey::new(BASE64.encode(blob));

        let result = unwrap_group_key(&manipuliert, &pair.private_key_pem);
        assert!(matches!(result, Err(CryptoError::SchluesselAuswickeln)));
    }

    #[test]
    fn kein_base64_blob_schlaegt_fehl() {
        let pair = generate_key_pair().unwrap();
        let result = unwrap_group_key(
            &WrappedGroupKey::new("kein base64 !!!".to_string()),
            &pair.private_key_pem,
        );
        assert!(matches!(result, Err(CryptoError::SchluesselAuswickeln)));
    }

    #[test]
    fn ungueltiges_mitglieds_pem_schlaegt_fehl() {
        let key = create_group_key().unwrap();
        let result = wrap_group_key(&key, "kein PEM");
        assert!(matches!(result, Err(CryptoError::UngueltigerSchluessel(_))));
    }
}
