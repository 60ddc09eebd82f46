//! Fehlertypen fuer das Verschluesselungs-Subsystem

use thiserror::Error;

/// Fehler im Verschluesselungs-Subsystem
///
/// Alle Fehler sind terminal fuer den jeweiligen Aufruf; Wiederholungen
/// gehoeren in die aufrufende Schicht.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Schluessel-Generierung fehlgeschlagen: {0}")]
    SchluesselGenerierung(String),

    #[error("Ungueltiger Schluessel: {0}")]
    UngueltigerSchluessel(String),

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Ungueltiger Umschlag: {0}")]
    UngueltigerUmschlag(String),

    // Die beiden Entschluesselungs-Pfade tragen keine Ursachen-Details:
    // die Meldung darf nicht verraten, welcher interne Schritt
    // fehlgeschlagen ist (Orakel-Vermeidung).
    #[error("Schluessel-Auswickeln fehlgeschlagen")]
    SchluesselAuswickeln,

    #[error("Entschluesselung fehlgeschlagen")]
    Entschluesselung,

    #[error("Kein Gruppen-Schluessel fuer Raum {room_id}")]
    KeinRaumSchluessel { room_id: String },

    #[error("Gruppen-Schluessel fuer Raum {room_id} existiert bereits")]
    RaumSchluesselVorhanden { room_id: String },

    #[error("Kein oeffentlicher Schluessel fuer Mitglied {user_id}")]
    OeffentlicherSchluesselFehlt { user_id: String },
}

impl CryptoError {
    /// Generische Meldung fuer Endbenutzer
    ///
    /// An der Anwendungsgrenze wird nie der rohe Fehler angezeigt,
    /// sondern immer dieser eine Text.
    pub fn user_message(&self) -> &'static str {
        "Die Nachricht konnte nicht verarbeitet werden"
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
