use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result as AnyResult;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};

use crate::{AppError, AppResult};

const PARTIAL_SUFFIX: &str = ".partial";

/// Open (creating if necessary) the SQLite database at `db_path`.
pub async fn connect_sqlite_pool(db_path: &Path) -> AnyResult<Pool<Sqlite>> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            tracing::error!(
                target: "carrickmore",
                error = %e,
                event = "db_dir_create_failed",
                path = %parent.display()
            );
            e
        })?;
    }
    tracing::info!(target: "carrickmore", event = "db_path", path = %db_path.display());

    let opts = SqliteConnectOptions::from_str(
        db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("database path is not valid UTF-8"))?,
    )?
    .create_if_missing(true)
    .journal_mode(SqliteJournalMode::Wal)
    .synchronous(SqliteSynchronous::Full);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .after_connect(|conn, _| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys=ON;")
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("PRAGMA busy_timeout = 5000;")
                    .execute(&mut *conn)
                    .await?;
                Ok::<_, sqlx::Error>(())
            })
        })
        .connect_with(opts)
        .await?;

    log_effective_pragmas(&pool).await;

    Ok(pool)
}

async fn log_effective_pragmas(pool: &Pool<Sqlite>) {
    use tracing::{info, warn};

    let (sqlite_ver,): (String,) = sqlx::query_as("select sqlite_version()")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let jm: (String,) = sqlx::query_as("PRAGMA journal_mode;")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let fks: (i64,) = sqlx::query_as("PRAGMA foreign_keys;")
        .fetch_one(pool)
        .await
        .unwrap_or((i64::MIN,));

    info!(
        target: "carrickmore",
        event = "db_open",
        sqlite_version = %sqlite_ver,
        journal_mode = %jm.0,
        foreign_keys = %fks.0
    );

    if !jm.0.eq_ignore_ascii_case("wal") {
        warn!(
            target: "carrickmore",
            event = "db_open_warning",
            msg = "journal_mode != WAL; running with reduced crash safety"
        );
    }
}

fn tmp_path(final_path: &Path) -> PathBuf {
    let mut s = OsString::from(final_path.as_os_str());
    s.push(PARTIAL_SUFFIX);
    PathBuf::from(s)
}

/// Write `bytes` to `path` via a sibling temp file and an atomic rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes).map_err(|err| {
        AppError::from(err)
            .with_context("operation", "write_partial")
            .with_context("path", tmp.display().to_string())
    })?;
    fs::rename(&tmp, path).map_err(|err| {
        AppError::from(err)
            .with_context("operation", "rename_partial")
            .with_context("path", path.display().to_string())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_leaves_no_partial_behind() {
        let dir = TempDir::new().expect("temp dir");
        let target = dir.path().join("out.csv");
        write_atomic(&target, b"a,b\n1,2\n").expect("atomic write");

        assert_eq!(fs::read(&target).expect("read back"), b"a,b\n1,2\n");
        assert!(!tmp_path(&target).exists());
    }

    #[tokio::test]
    async fn pool_opens_with_wal_and_foreign_keys() {
        let dir = TempDir::new().expect("temp dir");
        let pool = connect_sqlite_pool(&dir.path().join("carrickmore.sqlite3"))
            .await
            .expect("open pool");

        let (fks,): (i64,) = sqlx::query_as("PRAGMA foreign_keys;")
            .fetch_one(&pool)
            .await
            .expect("pragma query");
        assert_eq!(fks, 1);
    }
}
