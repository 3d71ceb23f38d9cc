//! Safety-contact schema adapter. Importable; the name column is required
//! and the store-wide single-primary invariant is enforced by the engine.

use crate::model::SafetyContact;
use crate::tabular::coerce;
use crate::tabular::{CellValue, Row};

use super::field_text;

pub const HEADERS: &[&str] = &["Name", "Phone", "Email", "Relationship", "Primary"];

const NAME: &[&str] = &["Name", "Contact Name"];
const PHONE: &[&str] = &["Phone", "Phone Number"];
const EMAIL: &[&str] = &["Email", "E-mail"];
const RELATIONSHIP: &[&str] = &["Relationship", "Relation"];
const PRIMARY: &[&str] = &["Primary", "Is Primary"];

pub fn export_row(contact: &SafetyContact) -> Row {
    let mut row = Row::new();
    row.insert("Name", CellValue::text(contact.name.clone()));
    row.insert(
        "Phone",
        contact
            .phone
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Email",
        contact
            .email
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Relationship",
        contact
            .relationship
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Primary",
        CellValue::text(coerce::format_yes_no(contact.is_primary)),
    );
    row
}

/// Build a typed contact from an import row; `None` when the required name
/// is blank.
pub fn from_row(row: &Row, id: String, now_ms: i64) -> Option<SafetyContact> {
    let name = field_text(row, NAME)?;
    Some(SafetyContact {
        id,
        name,
        phone: field_text(row, PHONE),
        email: field_text(row, EMAIL),
        relationship: field_text(row, RELATIONSHIP),
        is_primary: coerce::yes_no(field_text(row, PRIMARY).as_deref()),
        created_at: now_ms,
        updated_at: now_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_from(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), CellValue::from(v.to_string())))
            .collect()
    }

    #[test]
    fn missing_name_rejects_the_row() {
        let row = row_from(&[("Phone", "555-0100")]);
        assert!(from_row(&row, "id".into(), 0).is_none());
    }

    #[test]
    fn primary_flag_reads_yes_only() {
        let yes = from_row(&row_from(&[("Name", "Ann"), ("Primary", " Yes ")]), "a".into(), 0)
            .expect("accepted");
        assert!(yes.is_primary);

        let no = from_row(&row_from(&[("Name", "Ben"), ("Primary", "true")]), "b".into(), 0)
            .expect("accepted");
        assert!(!no.is_primary);
    }

    #[test]
    fn export_then_import_round_trips() {
        let contact = SafetyContact {
            id: "s1".into(),
            name: "Ann".into(),
            phone: Some("555-0100".into()),
            email: None,
            relationship: Some("sister".into()),
            is_primary: true,
            created_at: 0,
            updated_at: 0,
        };
        let row = export_row(&contact);
        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, HEADERS);

        let back = from_row(&row, "s2".into(), 9).expect("row accepted");
        assert_eq!(back.name, contact.name);
        assert_eq!(back.phone, contact.phone);
        assert_eq!(back.relationship, contact.relationship);
        assert!(back.is_primary);
    }
}
