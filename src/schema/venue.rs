//! Venue schema adapter. Export-only.

use crate::model::Venue;
use crate::tabular::{CellValue, Row};

pub const HEADERS: &[&str] = &["Name", "Address", "City", "Notes"];

pub fn export_row(venue: &Venue) -> Row {
    let mut row = Row::new();
    row.insert("Name", CellValue::text(venue.name.clone()));
    row.insert(
        "Address",
        venue
            .address
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "City",
        venue
            .city
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Notes",
        venue
            .notes
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row
}
