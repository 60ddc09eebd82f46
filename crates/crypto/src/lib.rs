//! # rendezvous-crypto
//!
//! Ende-zu-Ende Verschluesselung fuer Rendezvous.
//!
//! Hybrides Verfahren: Nachrichten werden symmetrisch (AES-256-GCM)
//! verschluesselt, der Nachrichten-Schluessel wird pro Empfaenger
//! asymmetrisch (RSA-2048, OAEP mit SHA-256) eingewickelt. Raeume teilen
//! einen Gruppen-Schluessel, der pro Mitglied eingewickelt verteilt wird.
//!
//! ## Module
//! - `keypair` - RSA-Schluessel-Paare und Fingerprints
//! - `e2e` - Nachrichten-Umschlaege und Gruppen-Schluessel-Verteilung
//! - `types` - Gemeinsame Typen (KeyPair, EncryptedEnvelope, GroupKey, etc.)
//! - `error` - Fehlertypen
//!
//! Persistenz und Transport sind Sache der aufrufenden Schichten: dieses
//! Crate liefert und konsumiert ausschliesslich PEM-Schluessel und
//! Base64-Blobs. Private Schluessel verlassen die Generierung genau einmal
//! und werden nie serverseitig gespeichert.

pub mod e2e;
pub mod error;
pub mod keypair;
pub mod types;

// Bequeme Re-Exports
pub use error::{CryptoError, CryptoResult};
pub use keypair::{fingerprint, generate_key_pair, FINGERPRINT_DISPLAY_BYTES, RSA_KEY_BITS};
pub use types::{EncryptedEnvelope, GroupKey, KeyPair, SecretBytes, WrappedGroupKey};

pub use e2e::{
    create_group_key, decrypt_message, encrypt_message, unwrap_group_key, wrap_group_key,
    GroupKeyConfig, GroupKeyManager, MissingKeyPolicy, RoomMember,
};
