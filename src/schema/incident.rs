//! Incident schema adapter. Export-only.

use std::collections::HashMap;

use crate::model::Incident;
use crate::tabular::coerce;
use crate::tabular::{CellValue, Row};

pub const HEADERS: &[&str] = &["Date", "Client", "Severity", "Description", "Action Taken"];

pub const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

pub fn export_row(incident: &Incident, client_names: &HashMap<String, String>) -> Row {
    let mut row = Row::new();
    row.insert("Date", CellValue::from(coerce::format_date(incident.date)));
    row.insert(
        "Client",
        CellValue::from(
            incident
                .client_id
                .as_ref()
                .and_then(|id| client_names.get(id).cloned())
                .unwrap_or_default(),
        ),
    );
    row.insert("Severity", CellValue::text(incident.severity.clone()));
    row.insert(
        "Description",
        incident
            .description
            .clone()
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty),
    );
    row.insert(
        "Action Taken",
        incident
            .action_taken
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
    fn export_carries_all_columns_in_order() {
        let incident = Incident {
            id: "i1".into(),
            client_id: Some("c1".into()),
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
            severity: "high".into(),
            description: Some("no-show, repeated calls".into()),
            action_taken: Some("blocked".into()),
            created_at: 0,
            updated_at: 0,
        };
        let names = HashMap::from([("c1".to_string(), "Jane".to_string())]);
        let row = export_row(&incident, &names);
        let headers: Vec<&str> = row.headers().collect();
        assert_eq!(headers, HEADERS);
        assert_eq!(row.text("Severity").as_deref(), Some("high"));
        assert_eq!(row.text("Client").as_deref(), Some("Jane"));
    }
}
