//! Hand-rolled tokenizer for quoted, delimited text.
//!
//! The grammar is RFC 4180-like: fields separated by a single delimiter
//! character, optionally quoted with `"`, a doubled `""` inside quotes
//! standing for one literal quote. Inside quotes the delimiter and line
//! breaks lose their structural meaning. Rows end at `\n` or `\r\n`; a `\r`
//! not followed by `\n` is ordinary data.

use super::sheet::{CellValue, Row};

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    delimiter: char,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer { delimiter: ',' }
    }
}

impl Tokenizer {
    pub fn new(delimiter: char) -> Self {
        Tokenizer { delimiter }
    }

    /// Split raw text into rows of string fields.
    ///
    /// Rows whose fields are all blank are dropped, wherever they occur.
    /// An unterminated quote at end of input is tolerated: whatever
    /// literal characters accumulated become the final field.
    pub fn tokenize(&self, text: &str) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut fields: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;

        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
                continue;
            }
            match c {
                '"' => in_quotes = true,
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    fields.push(std::mem::take(&mut field));
                    flush_row(&mut rows, &mut fields);
                }
                '\n' => {
                    fields.push(std::mem::take(&mut field));
                    flush_row(&mut rows, &mut fields);
                }
                d if d == self.delimiter => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }

        if !field.is_empty() || !fields.is_empty() {
            fields.push(field);
            flush_row(&mut rows, &mut fields);
        }

        rows
    }

    /// Tokenize and key data rows by the header row.
    ///
    /// The first surviving row supplies the headers; later rows map to them
    /// by position. A short row leaves its trailing headers unset; surplus
    /// fields beyond the header count are discarded. Fewer than two
    /// surviving rows yield no output.
    pub fn parse_rows(&self, text: &str) -> Vec<Row> {
        let mut raw = self.tokenize(text).into_iter();
        let Some(header_fields) = raw.next() else {
            return Vec::new();
        };
        let headers: Vec<String> = header_fields
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut out = Vec::new();
        for fields in raw {
            let mut row = Row::new();
            for (header, value) in headers.iter().zip(fields.into_iter()) {
                if header.is_empty() {
                    continue;
                }
                row.insert(header.clone(), CellValue::from(value));
            }
            out.push(row);
        }
        out
    }
}

fn flush_row(rows: &mut Vec<Vec<String>>, fields: &mut Vec<String>) {
    let taken = std::mem::take(fields);
    if taken.iter().all(|f| f.trim().is_empty()) {
        return;
    }
    rows.push(taken);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str) -> Vec<Vec<String>> {
        Tokenizer::default().tokenize(text)
    }

    #[test]
    fn splits_plain_fields() {
        assert_eq!(tok("a,b,c"), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn quoted_fields_keep_delimiters_and_newlines() {
        let rows = tok("\"a,b\",\"line1\nline2\",plain");
        assert_eq!(rows, vec![vec!["a,b", "line1\nline2", "plain"]]);
    }

    #[test]
    fn doubled_quote_is_one_literal_quote() {
        assert_eq!(tok("\"say \"\"hi\"\"\""), vec![vec!["say \"hi\""]]);
    }

    #[test]
    fn crlf_is_one_row_break() {
        assert_eq!(tok("a,b\r\nc,d"), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn lone_carriage_return_is_data() {
        assert_eq!(tok("a\rb,c"), vec![vec!["a\rb", "c"]]);
    }

    #[test]
    fn blank_rows_are_dropped_anywhere() {
        let rows = tok("a,b\n , \n\nc,d\n  \n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn unterminated_quote_emits_accumulated_field() {
        assert_eq!(tok("a,\"unfinished"), vec![vec!["a", "unfinished"]]);
    }

    #[test]
    fn trailing_delimiter_keeps_empty_last_field() {
        assert_eq!(tok("a,b,\nc,,d"), vec![vec!["a", "b", ""], vec!["c", "", "d"]]);
    }

    #[test]
    fn tab_delimiter_is_honoured() {
        let rows = Tokenizer::new('\t').tokenize("a\tb\nc\td");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn parse_rows_keys_by_header_position() {
        let rows = Tokenizer::default().parse_rows("Alias,Phone\nJane,555-0100\nMags");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("Alias").as_deref(), Some("Jane"));
        assert_eq!(rows[0].text("Phone").as_deref(), Some("555-0100"));
        assert_eq!(rows[1].text("Alias").as_deref(), Some("Mags"));
        assert_eq!(rows[1].text("Phone"), None);
    }

    #[test]
    fn parse_rows_needs_a_header_and_data() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.parse_rows("").is_empty());
        assert!(tokenizer.parse_rows("Alias,Phone\n").is_empty());
        assert!(tokenizer.parse_rows("Alias,Phone\n , \n").is_empty());
    }

    #[test]
    fn surplus_fields_beyond_headers_are_discarded() {
        let rows = Tokenizer::default().parse_rows("Alias\nJane,extra,more");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0].text("Alias").as_deref(), Some("Jane"));
    }
}
