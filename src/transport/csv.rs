use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::data::Table;
use crate::errors::SamplerError;
use crate::types::{Cell, Row};

/// Read a headered CSV stream into a table.
///
/// Cells that are empty or whitespace-only become nulls. Ragged rows are
/// rejected by the CSV reader.
pub fn read_table<R: Read>(reader: R) -> Result<Table, SamplerError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut table = Table::new(headers.iter())?;
    for record in reader.records() {
        let record = record?;
        let row: Row = record.iter().map(parse_cell).collect();
        table.push_row(row)?;
    }
    Ok(table)
}

/// Read a CSV file into a table.
pub fn read_table_from_path(path: &Path) -> Result<Table, SamplerError> {
    read_table(File::open(path)?)
}

/// Write `table` as headered CSV. Nulls are written as empty fields.
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<(), SamplerError> {
    let mut writer = ::csv::Writer::from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `table` to a CSV file, creating or truncating it.
pub fn write_table_to_path(path: &Path, table: &Table) -> Result<(), SamplerError> {
    write_table(File::create(path)?, table)
}

fn parse_cell(raw: &str) -> Cell {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row_of;
    use tempfile::tempdir;

    #[test]
    fn reads_headers_and_nulls() {
        let input = "kategori,session_id,text\nA,1,\"hello, world\"\nA,,   \nB,2,bye\n";
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.columns(), ["kategori", "session_id", "text"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(0, 2), Some("hello, world"));
        assert_eq!(table.value(1, 1), None);
        assert_eq!(table.value(1, 2), None);
    }

    #[test]
    fn rejects_ragged_rows_and_duplicate_headers() {
        assert!(matches!(
            read_table("a,b\n1,2,3\n".as_bytes()),
            Err(SamplerError::Csv(_))
        ));
        assert!(matches!(
            read_table("a,a\n1,2\n".as_bytes()),
            Err(SamplerError::Configuration(_))
        ));
    }

    #[test]
    fn writes_nulls_as_empty_fields() {
        let table = Table::with_rows(
            ["kategori", "session_id"],
            vec![row_of(["A", "1"]), vec![Some("B".into()), None]],
        )
        .unwrap();
        let mut buffer = Vec::new();
        write_table(&mut buffer, &table).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "kategori,session_id\nA,1\nB,\n"
        );
    }

    #[test]
    fn file_round_trip_preserves_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("population.csv");
        let table = Table::with_rows(
            ["kategori", "session_id", "note"],
            vec![
                row_of(["A", "1", "first"]),
                vec![Some("A".into()), None, Some("quoted \"value\"".into())],
            ],
        )
        .unwrap();
        write_table_to_path(&path, &table).unwrap();
        assert_eq!(read_table_from_path(&path).unwrap(), table);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_table_from_path(&dir.path().join("absent.csv")),
            Err(SamplerError::Io(_))
        ));
    }
}
