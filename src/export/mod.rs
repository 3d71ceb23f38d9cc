//! Export orchestrator: entities → adapter rows → codec → named file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::info;

use crate::model::{Booking, EXPORT_WRITE_FAILED};
use crate::schema::{self, EntityKind};
use crate::tabular::{self, ExportFormat, Row, Sheet, WorkbookCodec};
use crate::{db, repo, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Export every record of `kind` in the requested format.
///
/// Returns `None` — doing nothing observable — when the collection is
/// empty. Join maps are built once per call from a full scan of the
/// dependency collection, so each row resolves its joins in O(1).
pub async fn export_kind(
    pool: &SqlitePool,
    kind: EntityKind,
    format: ExportFormat,
    workbook: &dyn WorkbookCodec,
) -> AppResult<Option<ExportFile>> {
    let rows = collect_rows(pool, kind).await?;
    if rows.is_empty() {
        info!(target: "carrickmore", event = "export_empty", kind = kind.as_str());
        return Ok(None);
    }

    let headers = headers_for(kind);
    let mut sheet = Sheet::new(kind.file_stem(), headers.iter().map(|h| h.to_string()).collect());
    for row in &rows {
        sheet.push_row(
            headers
                .iter()
                .map(|header| row.get(header).cloned().unwrap_or(tabular::CellValue::Empty))
                .collect(),
        );
    }

    let bytes = tabular::serialize(&sheet, format, workbook)?;
    let file_name = format!("{}.{}", kind.file_stem(), format.extension());
    info!(
        target: "carrickmore",
        event = "export_done",
        kind = kind.as_str(),
        file = file_name.as_str(),
        rows = rows.len()
    );
    Ok(Some(ExportFile { file_name, bytes }))
}

/// Write an export to `dir` atomically; returns the final path.
pub fn write_export(file: &ExportFile, dir: &Path) -> AppResult<PathBuf> {
    let path = dir.join(&file.file_name);
    db::write_atomic(&path, &file.bytes).map_err(|err| {
        crate::AppError::new(EXPORT_WRITE_FAILED, "Could not write the export file")
            .with_context("path", path.display().to_string())
            .with_cause(err)
    })?;
    Ok(path)
}

fn headers_for(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Client => schema::client::HEADERS,
        EntityKind::Booking => schema::booking::HEADERS,
        EntityKind::Transaction => schema::transaction::HEADERS,
        EntityKind::SafetyContact => schema::safety_contact::HEADERS,
        EntityKind::Incident => schema::incident::HEADERS,
        EntityKind::SafetyCheck => schema::safety_check::HEADERS,
        EntityKind::Venue => schema::venue::HEADERS,
    }
}

async fn collect_rows(pool: &SqlitePool, kind: EntityKind) -> AppResult<Vec<Row>> {
    match kind {
        EntityKind::Client => Ok(repo::list_clients(pool)
            .await?
            .iter()
            .map(schema::client::export_row)
            .collect()),
        EntityKind::Booking => {
            let names = client_name_map(pool).await?;
            Ok(repo::list_bookings(pool)
                .await?
                .iter()
                .map(|b| schema::booking::export_row(b, &names))
                .collect())
        }
        EntityKind::Transaction => {
            let names = client_name_map(pool).await?;
            Ok(repo::list_transactions(pool)
                .await?
                .iter()
                .map(|t| schema::transaction::export_row(t, &names))
                .collect())
        }
        EntityKind::SafetyContact => Ok(repo::list_safety_contacts(pool)
            .await?
            .iter()
            .map(schema::safety_contact::export_row)
            .collect()),
        EntityKind::Incident => {
            let names = client_name_map(pool).await?;
            Ok(repo::list_incidents(pool)
                .await?
                .iter()
                .map(|i| schema::incident::export_row(i, &names))
                .collect())
        }
        EntityKind::SafetyCheck => {
            let names = client_name_map(pool).await?;
            let bookings = booking_map(pool).await?;
            Ok(repo::list_safety_checks(pool)
                .await?
                .iter()
                .map(|c| schema::safety_check::export_row(c, &bookings, &names))
                .collect())
        }
        EntityKind::Venue => Ok(repo::list_venues(pool)
            .await?
            .iter()
            .map(schema::venue::export_row)
            .collect()),
    }
}

async fn client_name_map(pool: &SqlitePool) -> AppResult<HashMap<String, String>> {
    Ok(repo::list_clients(pool)
        .await?
        .into_iter()
        .map(|client| (client.id, client.alias))
        .collect())
}

async fn booking_map(pool: &SqlitePool) -> AppResult<HashMap<String, Booking>> {
    Ok(repo::list_bookings(pool)
        .await?
        .into_iter()
        .map(|booking| (booking.id.clone(), booking))
        .collect())
}
