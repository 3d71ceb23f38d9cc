pub mod codec;
pub mod coerce;
pub mod sheet;
pub mod tokenizer;
pub mod workbook;

pub use codec::{deserialize, serialize, ExportFormat};
pub use sheet::{CellValue, Row, Sheet};
pub use tokenizer::Tokenizer;
pub use workbook::{MemoryWorkbookCodec, WorkbookCodec, WorkbookError};
