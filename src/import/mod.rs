//! Reconciliation engine: turns decoded rows into persisted records.
//!
//! Client import is the elaborate path — case-insensitive dedup against the
//! existing store, then a per-row quota check. The ordering is load-bearing:
//! a duplicate must never consume quota, and quota is evaluated per row
//! because later rows may still fit after earlier duplicates are skipped.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::model::{IMPORT_UNREADABLE_FILE, IMPORT_UNSUPPORTED_KIND};
use crate::quota::PlanPolicy;
use crate::schema::{self, EntityKind};
use crate::tabular::{self, Row, WorkbookCodec};
use crate::time::now_ms;
use crate::{id, repo, AppError, AppResult};

/// Outcome of a client import; the three counts cover every row whose key
/// field was present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientImportSummary {
    pub imported: u64,
    pub skipped: u64,
    pub duplicates: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ImportOutcome {
    Clients(ClientImportSummary),
    /// Plain inserted count for kinds without a uniqueness or quota rule.
    Records { imported: u64 },
}

/// Decode a user-supplied file and reconcile its rows into the store.
///
/// Structural failures (unreadable file, corrupt workbook) surface here,
/// before any row is processed; row-level problems are always recovered
/// locally by the per-kind loops.
pub async fn import_file(
    pool: &SqlitePool,
    kind: EntityKind,
    bytes: &[u8],
    filename_hint: &str,
    policy: &dyn PlanPolicy,
    workbook: &dyn WorkbookCodec,
) -> AppResult<ImportOutcome> {
    if !kind.supports_import() {
        return Err(unsupported_kind(kind));
    }

    let rows = tabular::deserialize(bytes, filename_hint, workbook).map_err(|err| {
        AppError::new(
            IMPORT_UNREADABLE_FILE,
            format!("Could not read {filename_hint}"),
        )
        .with_context("kind", kind.as_str())
        .with_cause(err)
    })?;

    info!(
        target: "carrickmore",
        event = "import_started",
        kind = kind.as_str(),
        file = filename_hint,
        rows = rows.len()
    );

    let outcome = import_rows(pool, kind, &rows, policy).await?;

    match &outcome {
        ImportOutcome::Clients(summary) => info!(
            target: "carrickmore",
            event = "import_done",
            kind = kind.as_str(),
            imported = summary.imported,
            skipped = summary.skipped,
            duplicates = summary.duplicates
        ),
        ImportOutcome::Records { imported } => info!(
            target: "carrickmore",
            event = "import_done",
            kind = kind.as_str(),
            imported = imported
        ),
    }

    Ok(outcome)
}

/// Reconcile already-decoded rows. Export-only kinds are rejected before
/// any row processing.
pub async fn import_rows(
    pool: &SqlitePool,
    kind: EntityKind,
    rows: &[Row],
    policy: &dyn PlanPolicy,
) -> AppResult<ImportOutcome> {
    match kind {
        EntityKind::Client => import_clients(pool, rows, policy)
            .await
            .map(ImportOutcome::Clients),
        EntityKind::Transaction => import_transactions(pool, rows)
            .await
            .map(|imported| ImportOutcome::Records { imported }),
        EntityKind::SafetyContact => import_safety_contacts(pool, rows)
            .await
            .map(|imported| ImportOutcome::Records { imported }),
        _ => Err(unsupported_kind(kind)),
    }
}

fn unsupported_kind(kind: EntityKind) -> AppError {
    AppError::new(
        IMPORT_UNSUPPORTED_KIND,
        format!("{} records are export-only and cannot be imported", kind),
    )
    .with_context("kind", kind.as_str())
}

async fn import_clients(
    pool: &SqlitePool,
    rows: &[Row],
    policy: &dyn PlanPolicy,
) -> AppResult<ClientImportSummary> {
    let existing = repo::list_clients(pool).await?;
    let mut alias_index: HashSet<String> = existing
        .iter()
        .map(|client| client.alias.to_lowercase())
        .collect();
    let mut active_count = existing.iter().filter(|c| c.is_active()).count() as u64;
    let ceiling = policy.client_ceiling();

    let mut summary = ClientImportSummary::default();
    let now = now_ms();

    for (position, row) in rows.iter().enumerate() {
        // Rows without the key field don't count toward any bucket.
        let Some(alias) = schema::client::key(row) else {
            continue;
        };
        let folded = alias.to_lowercase();

        // Duplicates are counted before the quota is consulted, so a
        // duplicate never consumes quota.
        if alias_index.contains(&folded) {
            summary.duplicates += 1;
            continue;
        }

        if let Some(cap) = ceiling {
            if active_count >= cap {
                summary.skipped += (rows.len() - position) as u64;
                info!(
                    target: "carrickmore",
                    event = "import_quota_reached",
                    ceiling = cap,
                    remaining_rows = rows.len() - position
                );
                break;
            }
        }

        let client = schema::client::from_row(row, id::new_entity_id(), alias, now);
        let is_active = client.is_active();
        repo::insert_client(pool, &client).await?;
        alias_index.insert(folded);
        summary.imported += 1;
        if is_active {
            active_count += 1;
        }
    }

    Ok(summary)
}

async fn import_transactions(pool: &SqlitePool, rows: &[Row]) -> AppResult<u64> {
    let mut imported = 0_u64;
    let now = now_ms();
    for row in rows {
        let Some(tx) = schema::transaction::from_row(row, id::new_entity_id(), now) else {
            continue;
        };
        repo::insert_transaction(pool, &tx).await?;
        imported += 1;
    }
    Ok(imported)
}

async fn import_safety_contacts(pool: &SqlitePool, rows: &[Row]) -> AppResult<u64> {
    let mut imported = 0_u64;
    let now = now_ms();
    for row in rows {
        let Some(contact) = schema::safety_contact::from_row(row, id::new_entity_id(), now) else {
            continue;
        };
        // Single-primary invariant: a primary row demotes everything before
        // it, so the last primary row in a batch ends up the sole primary.
        if contact.is_primary {
            repo::clear_primary_contacts(pool, now).await?;
        }
        repo::insert_safety_contact(pool, &contact).await?;
        imported += 1;
    }
    Ok(imported)
}
