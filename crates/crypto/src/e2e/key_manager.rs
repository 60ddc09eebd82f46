//! Gruppen-Schluessel-Verwaltung (Key Manager)
//!
//! Verwaltet pro Raum den Gruppen-Schluessel und die eingewickelten
//! Eintraege der Mitglieder:
//! - Erstellen und Verteilen bei Raum-Erstellung
//! - Einwickeln fuer neue Mitglieder bei Join
//! - Entfernen des Eintrags bei Leave (optional mit Rotation)
//!
//! Die Lifecycle-Hooks werden von der Raum-Verwaltung aufgerufen; die
//! zurueckgegebenen Blobs persistiert die aufrufende Schicht. Pro
//! (Mitglied, Raum) existiert hoechstens ein Eintrag.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;

use crate::e2e::group_key::{create_group_key, wrap_group_key};
use crate::error::{CryptoError, CryptoResult};
use crate::types::{GroupKey, WrappedGroupKey};

/// Verhalten fuer Mitglieder ohne registrierten oeffentlichen Schluessel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Mitglied ueberspringen; der Raum degradiert fuer dieses Mitglied
    /// zu unverschluesseltem Verlauf
    #[default]
    Skip,
    /// Raum-Erstellung schlaegt fehl
    Reject,
}

/// Konfiguration des [`GroupKeyManager`]
#[derive(Debug, Clone, Default)]
pub struct GroupKeyConfig {
    pub missing_key_policy: MissingKeyPolicy,
    /// Bei Leave einen frischen Schluessel erzeugen und fuer alle
    /// verbleibenden Mitglieder neu einwickeln. Ohne Rotation behaelt ein
    /// ausgetretenes Mitglied, das den Schluessel gespeichert hat, Zugriff
    /// auf den gesamten Verlauf.
    pub rotate_on_leave: bool,
}

/// Ein Raum-Mitglied aus Sicht der Schluessel-Verteilung
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub user_id: String,
    /// Oeffentlicher Schluessel (SPKI, PEM), falls registriert
    pub public_key_pem: Option<String>,
}

struct MemberEntry {
    public_key_pem: String,
    wrapped_key: WrappedGroupKey,
}

struct RoomKeys {
    group_key: GroupKey,
    members: HashMap<String, MemberEntry>,
}

/// Verwaltet Gruppen-Schluessel fuer alle Raeume
pub struct GroupKeyManager {
    config: GroupKeyConfig,
    rooms: DashMap<String, RoomKeys>,
}

impl Default for GroupKeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupKeyManager {
    pub fn new() -> Self {
        Self::with_config(GroupKeyConfig::default())
    }

    pub fn with_config(config: GroupKeyConfig) -> Self {
        Self {
            config,
            rooms: DashMap::new(),
        }
    }

    /// Erstellt den Gruppen-Schluessel eines neuen Raums und wickelt ihn
    /// fuer jedes Mitglied ein
    ///
    /// Gibt eine Map user_id -> eingewickelter Schluessel zurueck. Der
    /// Schluessel wird genau einmal pro Raum erzeugt; ein zweiter Aufruf
    /// fuer denselben Raum ist ein Fehler.
    pub fn on_room_created(
        &self,
        room_id: &str,
        members: &[RoomMember],
    ) -> CryptoResult<HashMap<String, WrappedGroupKey>> {
        let group_key = create_group_key()?;

        let mut entries = HashMap::new();
        for member in members {
            let Some(public_key_pem) = member.public_key_pem.as_deref() else {
                match self.config.missing_key_policy {
                    MissingKeyPolicy::Skip => {
                        tracing::warn!(
                            room_id,
                            user_id = %member.user_id,
                            "Mitglied ohne oeffentlichen Schluessel uebersprungen"
                        );
                        continue;
                    }
                    MissingKeyPolicy::Reject => {
                        return Err(CryptoError::OeffentlicherSchluesselFehlt {
                            user_id: member.user_id.clone(),
                        });
                    }
                }
            };

            let wrapped_key = wrap_group_key(&group_key, public_key_pem)?;
            entries.insert(
                member.user_id.clone(),
                MemberEntry {
                    public_key_pem: public_key_pem.to_string(),
                    wrapped_key,
                },
            );
        }

        match self.rooms.entry(room_id.to_string()) {
            Entry::Occupied(_) => Err(CryptoError::RaumSchluesselVorhanden {
                room_id: room_id.to_string(),
            }),
            Entry::Vacant(vacant) => {
                let result = entries
                    .iter()
                    .map(|(id, entry)| (id.clone(), entry.wrapped_key.clone()))
                    .collect::<HashMap<_, _>>();
                tracing::info!(
                    room_id,
                    members = result.len(),
                    "Gruppen-Schluessel erstellt und verteilt"
                );
                vacant.insert(RoomKeys { group_key, members: entries });
                Ok(result)
            }
        }
    }

    /// Wickelt den bestehenden Raum-Schluessel fuer ein neues Mitglied ein
    ///
    /// Rotiert nicht; die Eintraege der uebrigen Mitglieder bleiben
    /// unangetastet. Ein vorhandener Eintrag des Mitglieds wird ersetzt.
    pub fn on_member_join(
        &self,
        room_id: &str,
        user_id: &str,
        public_key_pem: &str,
    ) -> CryptoResult<WrappedGroupKey> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| CryptoError::KeinRaumSchluessel {
                room_id: room_id.to_string(),
            })?;

        let wrapped_key = wrap_group_key(&room.group_key, public_key_pem)?;
        room.members.insert(
            user_id.to_string(),
            MemberEntry {
                public_key_pem: public_key_pem.to_string(),
                wrapped_key: wrapped_key.clone(),
            },
        );

        tracing::debug!(room_id, user_id, "Gruppen-Schluessel fuer neues Mitglied eingewickelt");
        Ok(wrapped_key)
    }

    /// Entfernt den Eintrag eines Mitglieds
    ///
    /// Ohne `rotate_on_leave` bleibt der Schluessel unveraendert und es
    /// wird `None` zurueckgegeben; das ausgetretene Mitglied kann zuvor
    /// erhaltenes Material weiterhin entschluesseln. Mit Rotation wird ein
    /// frischer Schluessel fuer alle verbleibenden Mitglieder eingewickelt
    /// und die neuen Blobs zurueckgegeben.
    pub fn on_member_leave(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> CryptoResult<Option<HashMap<String, WrappedGroupKey>>> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| CryptoError::KeinRaumSchluessel {
                room_id: room_id.to_string(),
            })?;

        if room.members.remove(user_id).is_none() {
            tracing::debug!(room_id, user_id, "Kein Eintrag fuer Mitglied vorhanden");
        } else {
            tracing::debug!(room_id, user_id, "Eintrag des Mitglieds entfernt");
        }

        if !self.config.rotate_on_leave {
            return Ok(None);
        }

        let new_key = create_group_key()?;
        let mut result = HashMap::new();
        for (member_id, entry) in room.members.iter_mut() {
            let wrapped_key = wrap_group_key(&new_key, &entry.public_key_pem)?;
            entry.wrapped_key = wrapped_key.clone();
            result.insert(member_id.clone(), wrapped_key);
        }
        room.group_key = new_key;

        tracing::info!(
            room_id,
            members = result.len(),
            "Gruppen-Schluessel nach Austritt rotiert"
        );
        Ok(Some(result))
    }

    /// Gibt den eingewickelten Schluessel eines Mitglieds zurueck
    pub fn wrapped_key_for(&self, room_id: &str, user_id: &str) -> Option<WrappedGroupKey> {
        self.rooms
            .get(room_id)
            .and_then(|room| room.members.get(user_id).map(|e| e.wrapped_key.clone()))
    }

    /// Gibt alle eingewickelten Eintraege eines Raums zurueck
    pub fn wrapped_keys(&self, room_id: &str) -> Option<HashMap<String, WrappedGroupKey>> {
        self.rooms.get(room_id).map(|room| {
            room.members
                .iter()
                .map(|(id, entry)| (id.clone(), entry.wrapped_key.clone()))
                .collect()
        })
    }

    /// Entfernt einen Raum vollstaendig (bei Raum-Loeschung)
    pub fn remove_room(&self, room_id: &str) {
        self.rooms.remove(room_id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
