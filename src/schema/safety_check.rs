//! Safety-check schema adapter. Export-only; resolves its booking and that
//! booking's client through maps built once per export call.

use std::collections::HashMap;

use crate::model::{Booking, SafetyCheck};
use crate::tabular::coerce;
use crate::tabular::{CellValue, Row};

pub const HEADERS: &[&str] = &["Scheduled", "Booking Date", "Client", "Status", "Note"];

pub const STATUSES: &[&str] = &["pending", "confirmed", "missed", "cancelled"];

pub fn export_row(
    check: &SafetyCheck,
    bookings: &HashMap<String, Booking>,
    client_names: &HashMap<String, String>,
) -> Row {
    let booking = check.booking_id.as_ref().and_then(|id| bookings.get(id));

    let mut row = Row::new();
    row.insert(
        "Scheduled",
        CellValue::from(coerce::format_datetime(check.scheduled_at)),
    );
    row.insert(
        "Booking Date",
        CellValue::from(coerce::format_date(booking.and_then(|b| b.date))),
    );
    row.insert(
        "Client",
        CellValue::from(
            booking
                .and_then(|b| client_names.get(&b.client_id).cloned())
                .unwrap_or_default(),
        ),
    );
    row.insert("Status", CellValue::text(check.status.clone()));
    row.insert(
        "Note",
        check
            .note
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn export_resolves_booking_then_client() {
        let booking = Booking {
            id: "b1".into(),
            client_id: "c1".into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 4),
            start_time: None,
            duration_minutes: None,
            venue: None,
            amount_minor: None,
            status: "scheduled".into(),
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        let check = SafetyCheck {
            id: "sc1".into(),
            booking_id: Some("b1".into()),
            scheduled_at: Some(Utc.with_ymd_and_hms(2024, 7, 4, 22, 0, 0).unwrap()),
            status: "pending".into(),
            note: None,
            created_at: 0,
            updated_at: 0,
        };
        let bookings = HashMap::from([("b1".to_string(), booking)]);
        let names = HashMap::from([("c1".to_string(), "Jane".to_string())]);

        let row = export_row(&check, &bookings, &names);
        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, HEADERS);
        assert_eq!(row.text("Booking Date").as_deref(), Some("2024-07-04"));
        assert_eq!(row.text("Client").as_deref(), Some("Jane"));
        assert_eq!(row.text("Scheduled").as_deref(), Some("2024-07-04T22:00:00Z"));
    }

    #[test]
    fn dangling_booking_reference_renders_blank_joins() {
        let check = SafetyCheck {
            id: "sc1".into(),
            booking_id: Some("gone".into()),
            scheduled_at: None,
            status: "missed".into(),
            note: Some("no answer".into()),
            created_at: 0,
            updated_at: 0,
        };
        let row = export_row(&check, &HashMap::new(), &HashMap::new());
        assert_eq!(row.text("Booking Date"), None);
        assert_eq!(row.text("Client"), None);
        assert_eq!(row.text("Note").as_deref(), Some("no answer"));
    }
}
