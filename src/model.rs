use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const IMPORT_UNSUPPORTED_KIND: &str = "IMPORT/UNSUPPORTED_KIND";
pub const IMPORT_UNREADABLE_FILE: &str = "IMPORT/UNREADABLE_FILE";
pub const EXPORT_WRITE_FAILED: &str = "EXPORT/WRITE_FAILED";
pub const WORKBOOK_DECODE_ERROR: &str = "WORKBOOK/DECODE";
pub const WORKBOOK_ENCODE_ERROR: &str = "WORKBOOK/ENCODE";

/// A label attached to a client. The flat interchange form is
/// `icon name|color`, multiple tags joined by `"; "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            icon: None,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Client {
    pub id: String,
    /// Display alias; case-insensitively unique within the store.
    pub alias: String,
    pub legal_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_method: String,
    pub screening_status: String,
    pub risk_level: String,
    pub status: String,
    pub date_added: Option<NaiveDate>,
    pub tags: Vec<Tag>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Client {
    /// Active clients are the ones a plan ceiling counts.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub venue: Option<String>,
    /// Amount in minor currency units.
    pub amount_minor: Option<i64>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Amount in minor currency units; required on import.
    pub amount_minor: i64,
    pub direction: String,
    pub method: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SafetyContact {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub relationship: Option<String>,
    /// At most one contact in the store carries this flag.
    pub is_primary: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Incident {
    pub id: String,
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub severity: String,
    pub description: Option<String>,
    pub action_taken: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SafetyCheck {
    pub id: String,
    pub booking_id: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: String,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
