//! Per-entity-kind schema adapters.
//!
//! Each submodule is a static declaration: the ordered export column list
//! for its kind, the accepted import header spellings per canonical field,
//! and the enum domains its values are clamped to. The adapters own every
//! enum table; nothing else in the crate hard-codes an allowed value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tabular::coerce;
use crate::tabular::Row;

pub mod booking;
pub mod client;
pub mod incident;
pub mod safety_check;
pub mod safety_contact;
pub mod transaction;
pub mod venue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Booking,
    Transaction,
    SafetyContact,
    Incident,
    SafetyCheck,
    Venue,
}

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::Client,
        EntityKind::Booking,
        EntityKind::Transaction,
        EntityKind::SafetyContact,
        EntityKind::Incident,
        EntityKind::SafetyCheck,
        EntityKind::Venue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Booking => "booking",
            EntityKind::Transaction => "transaction",
            EntityKind::SafetyContact => "safety_contact",
            EntityKind::Incident => "incident",
            EntityKind::SafetyCheck => "safety_check",
            EntityKind::Venue => "venue",
        }
    }

    /// Export file stem and sheet name.
    pub fn file_stem(&self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Booking => "bookings",
            EntityKind::Transaction => "transactions",
            EntityKind::SafetyContact => "safety_contacts",
            EntityKind::Incident => "incidents",
            EntityKind::SafetyCheck => "safety_checks",
            EntityKind::Venue => "venues",
        }
    }

    /// Bookings, incidents, safety checks, and venues are export-only.
    pub fn supports_import(&self) -> bool {
        matches!(
            self,
            EntityKind::Client | EntityKind::Transaction | EntityKind::SafetyContact
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look a canonical field up under its accepted header spellings, current
/// export header first. The first alias with a non-blank cell wins. Values
/// are trimmed and stripped of the CSV formula guard.
pub(crate) fn field_text(row: &Row, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(value) = row.text(alias) {
            return Some(coerce::unguard(&value).to_string());
        }
    }
    None
}
