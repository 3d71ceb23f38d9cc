//! Record store: per-kind CRUD over the SQLite pool.
//!
//! Identifiers are opaque strings assigned by callers; list order is
//! insertion order (`created_at`, then id) so exports are stable.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row as SqlxRow, SqlitePool};

use crate::model::{Booking, Client, Incident, SafetyCheck, SafetyContact, Tag, Transaction, Venue};
use crate::tabular::coerce;
use crate::{AppError, AppResult};

fn wrap(err: sqlx::Error, operation: &'static str) -> AppError {
    AppError::from(err).with_context("operation", operation)
}

fn date_column(row: &SqliteRow, column: &str) -> Option<chrono::NaiveDate> {
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .and_then(|v| coerce::parse_date(&v))
}

fn tags_column(row: &SqliteRow) -> Vec<Tag> {
    row.try_get::<String, _>("tags")
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

// ---- clients ----

fn client_from_row(row: &SqliteRow) -> AppResult<Client> {
    Ok(Client {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_client"))?,
        alias: row.try_get("alias").map_err(|e| wrap(e, "decode_client"))?,
        legal_name: row.try_get("legal_name").unwrap_or_default(),
        phone: row.try_get("phone").unwrap_or_default(),
        email: row.try_get("email").unwrap_or_default(),
        contact_method: row
            .try_get("contact_method")
            .map_err(|e| wrap(e, "decode_client"))?,
        screening_status: row
            .try_get("screening_status")
            .map_err(|e| wrap(e, "decode_client"))?,
        risk_level: row
            .try_get("risk_level")
            .map_err(|e| wrap(e, "decode_client"))?,
        status: row.try_get("status").map_err(|e| wrap(e, "decode_client"))?,
        date_added: date_column(row, "date_added"),
        tags: tags_column(row),
        notes: row.try_get("notes").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_client"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_client"))?,
    })
}

pub async fn list_clients(pool: &SqlitePool) -> AppResult<Vec<Client>> {
    let rows = sqlx::query("SELECT * FROM clients ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_clients"))?;
    rows.iter().map(client_from_row).collect()
}

pub async fn insert_client(pool: &SqlitePool, client: &Client) -> AppResult<()> {
    let tags = serde_json::to_string(&client.tags).map_err(AppError::from)?;
    sqlx::query(
        "INSERT INTO clients (id, alias, legal_name, phone, email, contact_method, \
         screening_status, risk_level, status, date_added, tags, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(&client.id)
    .bind(&client.alias)
    .bind(&client.legal_name)
    .bind(&client.phone)
    .bind(&client.email)
    .bind(&client.contact_method)
    .bind(&client.screening_status)
    .bind(&client.risk_level)
    .bind(&client.status)
    .bind(client.date_added.map(|d| coerce::format_date(Some(d))))
    .bind(tags)
    .bind(&client.notes)
    .bind(client.created_at)
    .bind(client.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_client"))?;
    Ok(())
}

pub async fn delete_client(pool: &SqlitePool, id: &str) -> AppResult<()> {
    let res = sqlx::query("DELETE FROM clients WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| wrap(e, "delete_client"))?;
    if res.rows_affected() == 0 {
        return Err(AppError::new("SQLX/ROW_NOT_FOUND", "Record not found")
            .with_context("id", id.to_string()));
    }
    Ok(())
}

pub async fn count_active_clients(pool: &SqlitePool) -> AppResult<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE status = 'active'")
        .fetch_one(pool)
        .await
        .map_err(|e| wrap(e, "count_active_clients"))?;
    Ok(count.max(0) as u64)
}

// ---- bookings ----

fn booking_from_row(row: &SqliteRow) -> AppResult<Booking> {
    Ok(Booking {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_booking"))?,
        client_id: row
            .try_get("client_id")
            .map_err(|e| wrap(e, "decode_booking"))?,
        date: date_column(row, "date"),
        start_time: row.try_get("start_time").unwrap_or_default(),
        duration_minutes: row.try_get("duration_minutes").unwrap_or_default(),
        venue: row.try_get("venue").unwrap_or_default(),
        amount_minor: row.try_get("amount_minor").unwrap_or_default(),
        status: row.try_get("status").map_err(|e| wrap(e, "decode_booking"))?,
        notes: row.try_get("notes").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_booking"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_booking"))?,
    })
}

pub async fn list_bookings(pool: &SqlitePool) -> AppResult<Vec<Booking>> {
    let rows = sqlx::query("SELECT * FROM bookings ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_bookings"))?;
    rows.iter().map(booking_from_row).collect()
}

pub async fn insert_booking(pool: &SqlitePool, booking: &Booking) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO bookings (id, client_id, date, start_time, duration_minutes, venue, \
         amount_minor, status, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(&booking.id)
    .bind(&booking.client_id)
    .bind(booking.date.map(|d| coerce::format_date(Some(d))))
    .bind(&booking.start_time)
    .bind(booking.duration_minutes)
    .bind(&booking.venue)
    .bind(booking.amount_minor)
    .bind(&booking.status)
    .bind(&booking.notes)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_booking"))?;
    Ok(())
}

// ---- transactions ----

fn transaction_from_row(row: &SqliteRow) -> AppResult<Transaction> {
    Ok(Transaction {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_transaction"))?,
        client_id: row.try_get("client_id").unwrap_or_default(),
        date: date_column(row, "date"),
        amount_minor: row
            .try_get("amount_minor")
            .map_err(|e| wrap(e, "decode_transaction"))?,
        direction: row
            .try_get("direction")
            .map_err(|e| wrap(e, "decode_transaction"))?,
        method: row
            .try_get("method")
            .map_err(|e| wrap(e, "decode_transaction"))?,
        notes: row.try_get("notes").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_transaction"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_transaction"))?,
    })
}

pub async fn list_transactions(pool: &SqlitePool) -> AppResult<Vec<Transaction>> {
    let rows = sqlx::query("SELECT * FROM transactions ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_transactions"))?;
    rows.iter().map(transaction_from_row).collect()
}

pub async fn insert_transaction(
    pool: &SqlitePool,
    tx: &Transaction,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO transactions (id, client_id, date, amount_minor, direction, method, notes, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&tx.id)
    .bind(&tx.client_id)
    .bind(tx.date.map(|d| coerce::format_date(Some(d))))
    .bind(tx.amount_minor)
    .bind(&tx.direction)
    .bind(&tx.method)
    .bind(&tx.notes)
    .bind(tx.created_at)
    .bind(tx.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_transaction"))?;
    Ok(())
}

// ---- safety contacts ----

fn safety_contact_from_row(row: &SqliteRow) -> AppResult<SafetyContact> {
    Ok(SafetyContact {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_contact"))?,
        name: row.try_get("name").map_err(|e| wrap(e, "decode_contact"))?,
        phone: row.try_get("phone").unwrap_or_default(),
        email: row.try_get("email").unwrap_or_default(),
        relationship: row.try_get("relationship").unwrap_or_default(),
        is_primary: row.try_get::<i64, _>("is_primary").unwrap_or(0) != 0,
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_contact"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_contact"))?,
    })
}

pub async fn list_safety_contacts(pool: &SqlitePool) -> AppResult<Vec<SafetyContact>> {
    let rows = sqlx::query("SELECT * FROM safety_contacts ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_safety_contacts"))?;
    rows.iter().map(safety_contact_from_row).collect()
}

pub async fn insert_safety_contact(pool: &SqlitePool, contact: &SafetyContact) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO safety_contacts (id, name, phone, email, relationship, is_primary, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&contact.id)
    .bind(&contact.name)
    .bind(&contact.phone)
    .bind(&contact.email)
    .bind(&contact.relationship)
    .bind(contact.is_primary as i64)
    .bind(contact.created_at)
    .bind(contact.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_safety_contact"))?;
    Ok(())
}

/// Clear every primary flag; part of the single-primary invariant.
pub async fn clear_primary_contacts(pool: &SqlitePool, now_ms: i64) -> AppResult<()> {
    sqlx::query("UPDATE safety_contacts SET is_primary = 0, updated_at = ?1 WHERE is_primary = 1")
        .bind(now_ms)
        .execute(pool)
        .await
        .map_err(|e| wrap(e, "clear_primary_contacts"))?;
    Ok(())
}

// ---- incidents ----

fn incident_from_row(row: &SqliteRow) -> AppResult<Incident> {
    Ok(Incident {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_incident"))?,
        client_id: row.try_get("client_id").unwrap_or_default(),
        date: date_column(row, "date"),
        severity: row
            .try_get("severity")
            .map_err(|e| wrap(e, "decode_incident"))?,
        description: row.try_get("description").unwrap_or_default(),
        action_taken: row.try_get("action_taken").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_incident"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_incident"))?,
    })
}

pub async fn list_incidents(pool: &SqlitePool) -> AppResult<Vec<Incident>> {
    let rows = sqlx::query("SELECT * FROM incidents ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_incidents"))?;
    rows.iter().map(incident_from_row).collect()
}

pub async fn insert_incident(pool: &SqlitePool, incident: &Incident) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO incidents (id, client_id, date, severity, description, action_taken, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&incident.id)
    .bind(&incident.client_id)
    .bind(incident.date.map(|d| coerce::format_date(Some(d))))
    .bind(&incident.severity)
    .bind(&incident.description)
    .bind(&incident.action_taken)
    .bind(incident.created_at)
    .bind(incident.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_incident"))?;
    Ok(())
}

// ---- safety checks ----

fn safety_check_from_row(row: &SqliteRow) -> AppResult<SafetyCheck> {
    let scheduled_at = row
        .try_get::<Option<String>, _>("scheduled_at")
        .ok()
        .flatten()
        .and_then(|v| coerce::parse_datetime(&v));
    Ok(SafetyCheck {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_check"))?,
        booking_id: row.try_get("booking_id").unwrap_or_default(),
        scheduled_at,
        status: row.try_get("status").map_err(|e| wrap(e, "decode_check"))?,
        note: row.try_get("note").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_check"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_check"))?,
    })
}

pub async fn list_safety_checks(pool: &SqlitePool) -> AppResult<Vec<SafetyCheck>> {
    let rows = sqlx::query("SELECT * FROM safety_checks ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_safety_checks"))?;
    rows.iter().map(safety_check_from_row).collect()
}

pub async fn insert_safety_check(pool: &SqlitePool, check: &SafetyCheck) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO safety_checks (id, booking_id, scheduled_at, status, note, created_at, \
         updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&check.id)
    .bind(&check.booking_id)
    .bind(check.scheduled_at.map(|dt| coerce::format_datetime(Some(dt))))
    .bind(&check.status)
    .bind(&check.note)
    .bind(check.created_at)
    .bind(check.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_safety_check"))?;
    Ok(())
}

// ---- venues ----

fn venue_from_row(row: &SqliteRow) -> AppResult<Venue> {
    Ok(Venue {
        id: row.try_get("id").map_err(|e| wrap(e, "decode_venue"))?,
        name: row.try_get("name").map_err(|e| wrap(e, "decode_venue"))?,
        address: row.try_get("address").unwrap_or_default(),
        city: row.try_get("city").unwrap_or_default(),
        notes: row.try_get("notes").unwrap_or_default(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| wrap(e, "decode_venue"))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| wrap(e, "decode_venue"))?,
    })
}

pub async fn list_venues(pool: &SqlitePool) -> AppResult<Vec<Venue>> {
    let rows = sqlx::query("SELECT * FROM venues ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .map_err(|e| wrap(e, "list_venues"))?;
    rows.iter().map(venue_from_row).collect()
}

pub async fn insert_venue(pool: &SqlitePool, venue: &Venue) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO venues (id, name, address, city, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&venue.id)
    .bind(&venue.name)
    .bind(&venue.address)
    .bind(&venue.city)
    .bind(&venue.notes)
    .bind(venue.created_at)
    .bind(venue.updated_at)
    .execute(pool)
    .await
    .map_err(|e| wrap(e, "insert_venue"))?;
    Ok(())
}
