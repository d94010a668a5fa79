//! Writing records back to delimited text with their tags.

use std::io::Write;

use csv::WriterBuilder;

use csvt_core::SessionState;

use crate::error::{IngestError, Result};
use crate::options::CsvOptions;

/// Write the session as delimited text.
///
/// Leading rows are written back unchanged, except that the header row gains
/// the tag column when the source did not have one. Each record keeps its
/// original field order; the tag replaces the source tag column or is
/// appended as the last field. Untagged records get an empty tag field.
pub fn write_tagged_csv<W: Write>(
    writer: W,
    session: &SessionState,
    options: &CsvOptions,
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .delimiter(options.delimiter)
        .quote(options.quote)
        .from_writer(writer);
    let schema = session.schema();
    let tag_index = schema.tag_index();

    let leading = session.leading_rows();
    let header_row = if options.has_header {
        leading.len().checked_sub(1)
    } else {
        None
    };
    for (idx, row) in leading.iter().enumerate() {
        let written = if Some(idx) == header_row && tag_index.is_none() {
            let mut header = row.clone();
            header.push(schema.tag_column_name().to_string());
            writer.write_record(&header)
        } else {
            writer.write_record(row)
        };
        written.map_err(|source| IngestError::CsvWrite { source })?;
    }

    for record in session.store() {
        let tag = record.tag().unwrap_or_default();
        let mut fields = record.fields().to_vec();
        match tag_index {
            Some(index) => fields[index] = tag.to_string(),
            None => fields.push(tag.to_string()),
        }
        writer
            .write_record(&fields)
            .map_err(|source| IngestError::CsvWrite { source })?;
    }

    writer
        .flush()
        .map_err(|e| IngestError::CsvWrite { source: e.into() })?;
    Ok(())
}

/// Render the tagged output into memory, ready for an atomic write.
pub fn tagged_csv_bytes(session: &SessionState, options: &CsvOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_tagged_csv(&mut buffer, session, options)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportSettings, import_session};
    use crate::reader::parse_raw_table;
    use csvt_core::Navigator;
    use std::path::Path;

    fn import(text: &str, options: &CsvOptions) -> SessionState {
        let table = parse_raw_table(text.as_bytes(), options, Path::new("inline.csv")).unwrap();
        let settings = ImportSettings {
            tags: vec!["solo".to_string(), "shared".to_string()],
            ..ImportSettings::default()
        };
        import_session(table, &settings).unwrap().session
    }

    #[test]
    fn appends_tag_column() {
        let options = CsvOptions::default().with_delimiter(b';');
        let mut session = import("desc;amount\nbread;1,20\nrent;800\n", &options);
        Navigator::new(&mut session).tag_current("shared").unwrap();
        let text = String::from_utf8(tagged_csv_bytes(&session, &options).unwrap()).unwrap();
        assert_eq!(text, "desc;amount;tag\nbread;1,20;shared\nrent;800;\n");
    }

    #[test]
    fn replaces_existing_tag_column() {
        let options = CsvOptions::default();
        let mut session = import("tag,desc\n,bread\nsolo,rent\n", &options);
        Navigator::new(&mut session).tag_current("shared").unwrap();
        let text = String::from_utf8(tagged_csv_bytes(&session, &options).unwrap()).unwrap();
        assert_eq!(text, "tag,desc\nshared,bread\nsolo,rent\n");
    }

    #[test]
    fn keeps_preamble_and_quotes_fields() {
        let options = CsvOptions::default().with_skip_rows(2);
        let session = import("Account 42\ndesc\n\"Smith, J\"\n", &options);
        let text = String::from_utf8(tagged_csv_bytes(&session, &options).unwrap()).unwrap();
        assert_eq!(text, "Account 42\ndesc,tag\n\"Smith, J\",\n");
    }

    #[test]
    fn headerless_export_appends_tag_field_only() {
        let options = CsvOptions::default().with_header(false).with_skip_rows(0);
        let mut session = import("bread,1\n", &options);
        Navigator::new(&mut session).tag_current("solo").unwrap();
        let text = String::from_utf8(tagged_csv_bytes(&session, &options).unwrap()).unwrap();
        assert_eq!(text, "bread,1,solo\n");
    }
}
