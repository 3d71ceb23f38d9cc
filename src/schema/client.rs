//! Client schema adapter: the only kind with a uniqueness key, a quota
//! rule, and a legacy enumeration remap.

use crate::model::Client;
use crate::tabular::coerce;
use crate::tabular::{CellValue, Row};

use super::field_text;

/// Export column order; these exact strings are the wire format between this
/// tool's own exports and imports.
pub const HEADERS: &[&str] = &[
    "Alias",
    "Legal Name",
    "Phone",
    "Email",
    "Preferred Contact",
    "Screening Status",
    "Risk Level",
    "Status",
    "Date Added",
    "Tags",
    "Notes",
];

pub const CONTACT_METHODS: &[&str] = &["text", "call", "email", "app", "other"];
pub const DEFAULT_CONTACT_METHOD: &str = "text";

pub const SCREENING_STATUSES: &[&str] = &["unverified", "verified"];
pub const DEFAULT_SCREENING_STATUS: &str = "unverified";

pub const RISK_LEVELS: &[&str] = &["low", "medium", "high"];
pub const DEFAULT_RISK_LEVEL: &str = "medium";

pub const STATUSES: &[&str] = &["active", "inactive", "blocked"];
pub const DEFAULT_STATUS: &str = "active";

/// The screening domain used to be four-valued; old exports still carry
/// those spellings. They are mapped forward, not merely rejected.
const LEGACY_SCREENING: &[(&str, &str)] = &[
    ("pending", "unverified"),
    ("in-progress", "unverified"),
    ("failed", "unverified"),
    ("passed", "verified"),
];

// Accepted import spellings per canonical field, current export header
// first, legacy/alternate spellings after.
const ALIAS: &[&str] = &["Alias", "Name", "Client Name"];
const LEGAL_NAME: &[&str] = &["Legal Name", "Full Name", "Real Name"];
const PHONE: &[&str] = &["Phone", "Phone Number"];
const EMAIL: &[&str] = &["Email", "E-mail"];
const CONTACT_METHOD: &[&str] = &["Preferred Contact", "Contact Method"];
const SCREENING: &[&str] = &["Screening Status", "Screening"];
const RISK: &[&str] = &["Risk Level", "Risk"];
const STATUS: &[&str] = &["Status", "Client Status"];
const DATE_ADDED: &[&str] = &["Date Added", "Added", "Created"];
const TAGS: &[&str] = &["Tags", "Labels"];
const NOTES: &[&str] = &["Notes", "Comments"];

/// The required key field; `None` marks a row the engine skips uncounted.
pub fn key(row: &Row) -> Option<String> {
    field_text(row, ALIAS)
}

pub fn export_row(client: &Client) -> Row {
    let mut row = Row::new();
    row.insert("Alias", CellValue::text(client.alias.clone()));
    row.insert("Legal Name", opt_cell(&client.legal_name));
    row.insert("Phone", opt_cell(&client.phone));
    row.insert("Email", opt_cell(&client.email));
    row.insert(
        "Preferred Contact",
        CellValue::text(client.contact_method.clone()),
    );
    row.insert(
        "Screening Status",
        CellValue::text(client.screening_status.clone()),
    );
    row.insert("Risk Level", CellValue::text(client.risk_level.clone()));
    row.insert("Status", CellValue::text(client.status.clone()));
    row.insert(
        "Date Added",
        CellValue::from(coerce::format_date(client.date_added)),
    );
    row.insert("Tags", CellValue::from(coerce::format_tags(&client.tags)));
    row.insert("Notes", opt_cell(&client.notes));
    row
}

/// Build a typed client from an import row. The caller supplies the fresh
/// identifier and has already established that the key field is present.
pub fn from_row(row: &Row, id: String, alias: String, now_ms: i64) -> Client {
    Client {
        id,
        alias,
        legal_name: field_text(row, LEGAL_NAME),
        phone: field_text(row, PHONE),
        email: field_text(row, EMAIL),
        contact_method: enum_field(row, CONTACT_METHOD, CONTACT_METHODS, DEFAULT_CONTACT_METHOD),
        screening_status: screening_status(row),
        risk_level: enum_field(row, RISK, RISK_LEVELS, DEFAULT_RISK_LEVEL),
        status: enum_field(row, STATUS, STATUSES, DEFAULT_STATUS),
        date_added: field_text(row, DATE_ADDED).and_then(|v| coerce::parse_date(&v)),
        tags: field_text(row, TAGS)
            .map(|v| coerce::parse_tags(&v))
            .unwrap_or_default(),
        notes: field_text(row, NOTES),
        created_at: now_ms,
        updated_at: now_ms,
    }
}

fn screening_status(row: &Row) -> String {
    let raw = field_text(row, SCREENING).unwrap_or_default();
    let folded = raw.trim().to_lowercase();
    let remapped = LEGACY_SCREENING
        .iter()
        .find(|(legacy, _)| *legacy == folded)
        .map(|(_, current)| *current)
        .unwrap_or(folded.as_str());
    coerce::validate_enum(remapped, SCREENING_STATUSES, DEFAULT_SCREENING_STATUS)
}

fn enum_field(row: &Row, aliases: &[&str], allowed: &[&str], fallback: &str) -> String {
    let raw = field_text(row, aliases).unwrap_or_default();
    coerce::validate_enum(&raw.trim().to_lowercase(), allowed, fallback)
}

fn opt_cell(value: &Option<String>) -> CellValue {
    match value {
        Some(v) => CellValue::from(v.clone()),
        None => CellValue::Empty,
    }
}
