//! Transaction schema adapter. Importable; the amount column is required.

use std::collections::HashMap;

use crate::model::Transaction;
use crate::tabular::coerce;
use crate::tabular::{CellValue, Row};

use super::field_text;

pub const HEADERS: &[&str] = &["Date", "Client", "Type", "Amount", "Method", "Notes"];

pub const DIRECTIONS: &[&str] = &["income", "expense"];
pub const DEFAULT_DIRECTION: &str = "income";

pub const METHODS: &[&str] = &["cash", "bank_transfer", "crypto", "voucher", "other"];
pub const DEFAULT_METHOD: &str = "cash";

const DATE: &[&str] = &["Date", "Transaction Date"];
const DIRECTION: &[&str] = &["Type", "Direction"];
const AMOUNT: &[&str] = &["Amount", "Value"];
const METHOD: &[&str] = &["Method", "Payment Method"];
const NOTES: &[&str] = &["Notes", "Description"];

pub fn export_row(tx: &Transaction, client_names: &HashMap<String, String>) -> Row {
    let mut row = Row::new();
    row.insert("Date", CellValue::from(coerce::format_date(tx.date)));
    row.insert(
        "Client",
        CellValue::from(
            tx.client_id
                .as_ref()
                .and_then(|id| client_names.get(id).cloned())
                .unwrap_or_default(),
        ),
    );
    row.insert("Type", CellValue::text(tx.direction.clone()));
    row.insert(
        "Amount",
        CellValue::text(coerce::format_amount_minor(tx.amount_minor)),
    );
    row.insert("Method", CellValue::text(tx.method.clone()));
    row.insert(
        "Notes",
        tx.notes
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row
}

/// Build a typed transaction from an import row; `None` when the required
/// amount is blank or unparseable. Client linkage is not reconstructed on
/// import — the exported name is a display join, not a stable reference.
pub fn from_row(row: &Row, id: String, now_ms: i64) -> Option<Transaction> {
    let amount_minor = field_text(row, AMOUNT).and_then(|v| coerce::parse_amount_minor(&v))?;
    Some(Transaction {
        id,
        client_id: None,
        date: field_text(row, DATE).and_then(|v| coerce::parse_date(&v)),
        amount_minor,
        direction: enum_field(row, DIRECTION, DIRECTIONS, DEFAULT_DIRECTION),
        method: enum_field(row, METHOD, METHODS, DEFAULT_METHOD),
        notes: field_text(row, NOTES),
        created_at: now_ms,
        updated_at: now_ms,
    })
}

fn enum_field(row: &Row, aliases: &[&str], allowed: &[&str], fallback: &str) -> String {
    let raw = field_text(row, aliases).unwrap_or_default();
    coerce::validate_enum(&raw.trim().to_lowercase(), allowed, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row_from(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), CellValue::from(v.to_string())))
            .collect()
    }

    #[test]
    fn blank_amount_rejects_the_row() {
        let row = row_from(&[("Amount", ""), ("Date", "2024-01-01")]);
        assert!(from_row(&row, "id".into(), 0).is_none());
    }

    #[test]
    fn amount_and_date_coerce() {
        let row = row_from(&[("Amount", "£120.50"), ("Date", "2024-01-01"), ("Type", "expense")]);
        let tx = from_row(&row, "id".into(), 7).expect("row accepted");
        assert_eq!(tx.amount_minor, 12050);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(tx.direction, "expense");
        assert_eq!(tx.method, DEFAULT_METHOD);
    }

    #[test]
    fn export_resolves_the_client_name() {
        let tx = Transaction {
            id: "t1".into(),
            client_id: Some("c1".into()),
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            amount_minor: 9000,
            direction: "income".into(),
            method: "cash".into(),
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        let names = HashMap::from([("c1".to_string(), "Jane".to_string())]);
        let row = export_row(&tx, &names);
        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, HEADERS);
        assert_eq!(row.text("Client").as_deref(), Some("Jane"));
        assert_eq!(row.text("Amount").as_deref(), Some("90.00"));
    }
}
