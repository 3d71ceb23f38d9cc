//! Seam to the spreadsheet-format library.
//!
//! The core never links a workbook codec directly: it talks to this trait,
//! and the host injects whichever implementation it ships. The in-memory
//! implementation below carries sheets as a JSON payload, which is enough
//! for tests and headless round trips.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{WORKBOOK_DECODE_ERROR, WORKBOOK_ENCODE_ERROR};
use crate::AppError;

use super::sheet::Sheet;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("failed to decode workbook: {0}")]
    Decode(String),
    #[error("failed to encode workbook: {0}")]
    Encode(String),
    #[error("workbook contains no sheets")]
    NoSheets,
}

impl From<WorkbookError> for AppError {
    fn from(error: WorkbookError) -> Self {
        let code = match error {
            WorkbookError::Decode(_) | WorkbookError::NoSheets => WORKBOOK_DECODE_ERROR,
            WorkbookError::Encode(_) => WORKBOOK_ENCODE_ERROR,
        };
        AppError::new(code, error.to_string())
    }
}

pub trait WorkbookCodec: Send + Sync {
    /// Decode a workbook file into its sheets, first sheet first.
    fn load(&self, bytes: &[u8]) -> Result<Vec<Sheet>, WorkbookError>;

    /// Encode one sheet as a workbook file.
    fn write(&self, sheet: &Sheet) -> Result<Vec<u8>, WorkbookError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct MemoryWorkbookFile {
    sheets: Vec<Sheet>,
}

/// Workbook codec holding sheets as a JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryWorkbookCodec;

impl WorkbookCodec for MemoryWorkbookCodec {
    fn load(&self, bytes: &[u8]) -> Result<Vec<Sheet>, WorkbookError> {
        let file: MemoryWorkbookFile = serde_json::from_slice(bytes)
            .map_err(|err| WorkbookError::Decode(err.to_string()))?;
        Ok(file.sheets)
    }

    fn write(&self, sheet: &Sheet) -> Result<Vec<u8>, WorkbookError> {
        let file = MemoryWorkbookFile {
            sheets: vec![sheet.clone()],
        };
        serde_json::to_vec(&file).map_err(|err| WorkbookError::Encode(err.to_string()))
    }
}
