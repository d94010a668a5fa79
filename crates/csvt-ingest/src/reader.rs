//! Raw delimited-text loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};
use crate::options::CsvOptions;

/// Untyped rows of a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Rows before the data, kept verbatim for export.
    pub leading: Vec<Vec<String>>,
    /// Column names: the last leading row, when the file has a header.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Number of columns: the header width, or the widest data row.
    pub fn width(&self) -> usize {
        match &self.header {
            Some(header) => header.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// 1-based line number of the first data row.
    pub fn first_data_line(&self) -> usize {
        self.leading.len() + 1
    }
}

/// Read a delimited file into a [`RawTable`].
pub fn read_raw_table(path: &Path, options: &CsvOptions) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let table = parse_raw_table(file, options, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.width(),
        "read source table"
    );
    Ok(table)
}

/// Parse delimited text from any reader. `path` is only used in errors.
pub fn parse_raw_table<R: Read>(reader: R, options: &CsvOptions, path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_reader(reader);

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if all_rows.is_empty() {
            if let Some(first) = row.first_mut() {
                *first = first.trim_start_matches('\u{feff}').to_string();
            }
        }
        all_rows.push(row);
    }

    if all_rows.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let split = options.leading_rows().min(all_rows.len());
    let rows = all_rows.split_off(split);
    let leading = all_rows;
    let header = if options.has_header {
        leading.last().cloned()
    } else {
        None
    };
    Ok(RawTable {
        leading,
        header,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, options: &CsvOptions) -> RawTable {
        parse_raw_table(text.as_bytes(), options, Path::new("inline.csv")).unwrap()
    }

    #[test]
    fn splits_header_and_rows() {
        let table = parse("a,b\n1,2\n3,4\n", &CsvOptions::default());
        assert_eq!(table.header, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.first_data_line(), 2);
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn keeps_preamble_rows() {
        let text = "Account;123\nDate;Label;Debit\n01/02/2024;Bread;1,20\n";
        let options = CsvOptions::default().with_delimiter(b';').with_skip_rows(2);
        let table = parse(text, &options);
        assert_eq!(table.leading.len(), 2);
        assert_eq!(table.header.as_ref().map(Vec::len), Some(3));
        assert_eq!(table.rows, vec![vec!["01/02/2024", "Bread", "1,20"]]);
    }

    #[test]
    fn custom_quote_and_bom() {
        let text = "\u{feff}name,note\n|Smith, J|,ok\n";
        let options = CsvOptions::default().with_quote(b'|');
        let table = parse(text, &options);
        assert_eq!(table.header.unwrap()[0], "name");
        assert_eq!(table.rows[0][0], "Smith, J");
    }

    #[test]
    fn headerless_width_is_widest_row() {
        let options = CsvOptions::default().with_header(false).with_skip_rows(0);
        let table = parse("1,2\n3,4,5\n", &options);
        assert!(table.header.is_none());
        assert!(table.leading.is_empty());
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn empty_input_is_an_error() {
        let result = parse_raw_table("".as_bytes(), &CsvOptions::default(), Path::new("e.csv"));
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }
}
