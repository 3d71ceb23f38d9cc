//! Serialize/deserialize one structured sheet to and from its file forms.

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

use super::sheet::{CellValue, Row, Sheet};
use super::tokenizer::Tokenizer;
use super::workbook::{WorkbookCodec, WorkbookError};

/// How many data rows the workbook column-width heuristic samples.
const WIDTH_SAMPLE_ROWS: usize = 50;
const MAX_COLUMN_WIDTH: u16 = 48;
const MIN_COLUMN_WIDTH: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Serialize a sheet in the requested format.
pub fn serialize(
    sheet: &Sheet,
    format: ExportFormat,
    workbook: &dyn WorkbookCodec,
) -> AppResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => Ok(to_csv(sheet).into_bytes()),
        ExportFormat::Xlsx => {
            let mut sized = sheet.clone();
            sized.column_widths = column_widths(sheet);
            workbook.write(&sized).map_err(AppError::from)
        }
    }
}

/// Deserialize tabular rows from file bytes, inferring the format from the
/// file name: `.csv`/`.tsv` go through the text tokenizer, everything else
/// through the workbook codec.
///
/// Structurally odd input yields whatever well-formed rows can be recovered
/// (possibly none); only a file the codec cannot read at all is an error.
pub fn deserialize(
    bytes: &[u8],
    filename_hint: &str,
    workbook: &dyn WorkbookCodec,
) -> AppResult<Vec<Row>> {
    let lower = filename_hint.to_ascii_lowercase();
    if lower.ends_with(".csv") || lower.ends_with(".tsv") {
        let delimiter = if lower.ends_with(".tsv") { '\t' } else { ',' };
        let text = String::from_utf8_lossy(bytes);
        return Ok(Tokenizer::new(delimiter).parse_rows(&text));
    }

    let sheets = workbook.load(bytes).map_err(AppError::from)?;
    let Some(sheet) = sheets.into_iter().next() else {
        return Err(WorkbookError::NoSheets.into());
    };
    Ok(rows_from_sheet(sheet))
}

fn rows_from_sheet(sheet: Sheet) -> Vec<Row> {
    if sheet.rows.is_empty() {
        return Vec::new();
    }
    let headers: Vec<String> = sheet
        .headers
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Vec::new();
    }

    let mut out = Vec::new();
    for cells in sheet.rows {
        let mut row = Row::new();
        let mut any_value = false;
        for (header, cell) in headers.iter().zip(cells.into_iter()) {
            if header.is_empty() {
                continue;
            }
            if !cell.is_empty() {
                any_value = true;
            }
            row.insert(header.clone(), cell);
        }
        if any_value {
            out.push(row);
        }
    }
    out
}

fn to_csv(sheet: &Sheet) -> String {
    let mut out = String::new();
    write_csv_record(&mut out, sheet.headers.iter().map(String::as_str));
    for row in &sheet.rows {
        let rendered: Vec<String> = sheet
            .headers
            .iter()
            .enumerate()
            .map(|(i, _)| row.get(i).map(CellValue::display).unwrap_or_default())
            .collect();
        write_csv_record(&mut out, rendered.iter().map(String::as_str));
    }
    out
}

fn write_csv_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&csv_field(field));
    }
    out.push('\n');
}

/// Escape one CSV field.
///
/// Fields whose first character could trigger spreadsheet formula
/// evaluation (`=`, `+`, `-`, `@`, TAB, CR) get a leading apostrophe before
/// the ordinary quoting rule is applied.
fn csv_field(raw: &str) -> String {
    let guarded: std::borrow::Cow<'_, str> =
        if matches!(raw.chars().next(), Some('=' | '+' | '-' | '@' | '\t' | '\r')) {
            format!("'{raw}").into()
        } else {
            raw.into()
        };
    if guarded.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded.into_owned()
    }
}

fn column_widths(sheet: &Sheet) -> Vec<u16> {
    sheet
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest_value = sheet
                .rows
                .iter()
                .take(WIDTH_SAMPLE_ROWS)
                .filter_map(|row| row.get(col))
                .map(|cell| cell.display().chars().count())
                .max()
                .unwrap_or(0);
            let chars = header.chars().count().max(longest_value) as u16 + 2;
            chars.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}
