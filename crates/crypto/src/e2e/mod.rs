//! E2E Verschluesselung (End-to-End)
//!
//! Client <-> Client Verschluesselung. Der Server speichert und forwardet
//! nur undurchsichtige Blobs und kann keine Inhalte entschluesseln.
//!
//! ## Ablauf
//! 1. Jeder Benutzer erhaelt bei der Registrierung ein RSA-Schluessel-Paar
//! 2. Einzelnachricht: hybrider Umschlag fuer den Empfaenger
//! 3. Raum-Erstellung: ein Gruppen-Schluessel, pro Mitglied eingewickelt
//! 4. Join: bestehenden Schluessel fuer das neue Mitglied einwickeln
//! 5. Leave: Eintrag entfernen (Rotation optional per Konfiguration)

pub mod decrypt;
pub mod encrypt;
pub mod group_key;
pub mod key_manager;

pub use decrypt::decrypt_message;
pub use encrypt::{encrypt_message, AES_KEY_BYTES};
pub use group_key::{create_group_key, unwrap_group_key, wrap_group_key, GROUP_KEY_BYTES};
pub use key_manager::{GroupKeyConfig, GroupKeyManager, MissingKeyPolicy, RoomMember};
