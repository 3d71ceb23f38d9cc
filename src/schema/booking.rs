//! Booking schema adapter. Export-only: the client name is a display join
//! resolved through a map built once per export call.

use std::collections::HashMap;

use crate::model::Booking;
use crate::tabular::coerce;
use crate::tabular::{CellValue, Row};

pub const HEADERS: &[&str] = &[
    "Date",
    "Client",
    "Start Time",
    "Duration (min)",
    "Venue",
    "Amount",
    "Status",
    "Notes",
];

pub const STATUSES: &[&str] = &["scheduled", "completed", "cancelled", "no_show"];

pub fn export_row(booking: &Booking, client_names: &HashMap<String, String>) -> Row {
    let mut row = Row::new();
    row.insert("Date", CellValue::from(coerce::format_date(booking.date)));
    row.insert(
        "Client",
        CellValue::from(
            client_names
                .get(&booking.client_id)
                .cloned()
                .unwrap_or_default(),
        ),
    );
    row.insert(
        "Start Time",
        booking
            .start_time
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Duration (min)",
        booking
            .duration_minutes
            .map(|m| CellValue::Number(m as f64))
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Venue",
        booking
            .venue
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Amount",
        booking
            .amount_minor
            .map(|a| CellValue::text(coerce::format_amount_minor(a)))
            .unwrap_or(CellValue::Empty),
    );
    row.insert("Status", CellValue::text(booking.status.clone()));
    row.insert(
        "Notes",
        booking
            .notes
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn export_joins_client_and_formats_fields() {
        let booking = Booking {
            id: "b1".into(),
            client_id: "c1".into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 4),
            start_time: Some("19:30".into()),
            duration_minutes: Some(90),
            venue: Some("The Lansdowne".into()),
            amount_minor: Some(25000),
            status: "completed".into(),
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        let names = HashMap::from([("c1".to_string(), "Jane".to_string())]);

        let row = export_row(&booking, &names);
        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, HEADERS);
        assert_eq!(row.text("Client").as_deref(), Some("Jane"));
        assert_eq!(row.text("Duration (min)").as_deref(), Some("90"));
        assert_eq!(row.text("Amount").as_deref(), Some("250.00"));
    }

    #[test]
    fn unknown_client_renders_blank() {
        let booking = Booking {
            id: "b1".into(),
            client_id: "missing".into(),
            date: None,
            start_time: None,
            duration_minutes: None,
            venue: None,
            amount_minor: None,
            status: "scheduled".into(),
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        let row = export_row(&booking, &HashMap::new());
        assert_eq!(row.text("Client"), None);
    }
}
