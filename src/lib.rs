//! Carrickmore: a local client/booking record engine whose core is a
//! bidirectional tabular import/export pipeline.
//!
//! Data flows out as `entities → schema adapter → tabular codec → file
//! bytes`, and back in as `file bytes → codec → tokenizer → reconciliation
//! engine → record store`. The record store is SQLite behind [`repo`]; the
//! workbook format sits behind the injected [`tabular::WorkbookCodec`]
//! trait; plan limits sit behind [`quota::PlanPolicy`].

pub mod db;
pub mod error;
pub mod export;
pub mod id;
pub mod import;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod quota;
pub mod repo;
pub mod schema;
pub mod tabular;
pub mod time;

pub use error::{AppError, AppResult};
pub use export::{export_kind, write_export, ExportFile};
pub use import::{import_file, import_rows, ClientImportSummary, ImportOutcome};
pub use quota::{Plan, PlanPolicy};
pub use schema::EntityKind;
pub use tabular::{ExportFormat, MemoryWorkbookCodec, WorkbookCodec};
