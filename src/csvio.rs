//! CSV loader and writer collaborators.
//!
//! The loader turns a delimited file into the initial record sequence: the
//! first row is the header, every later row becomes one record keyed by the
//! header names. Short rows are tolerated (the record simply lacks those
//! columns); reconciliation happens at write time, not load time. The writer
//! serializes a materialized [`Table`] with standard CSV quoting, and is
//! only ever invoked after a successful pipeline run, so a failed run leaves
//! no output file behind.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::error::{AnnotateError, Result};
use crate::record::Record;
use crate::table::Table;

/// The loaded input: header in file order plus one record per data row.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub header: Vec<String>,
    pub records: Vec<Record>,
}

/// Read a CSV file into records keyed by its first row.
///
/// Fails with [`AnnotateError::EmptyInput`] when the file has no rows at
/// all, since there is no header to key records by.
pub fn read_table(path: impl AsRef<Path>) -> Result<LoadedTable> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = reader.records();
    let header: Vec<String> = match rows.next() {
        Some(row) => row?.iter().map(str::to_string).collect(),
        None => return Err(AnnotateError::EmptyInput),
    };

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        let record: Record = header
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    info!(
        path = %path.display(),
        columns = header.len(),
        records = records.len(),
        "read input table"
    );
    Ok(LoadedTable { header, records })
}

/// Write a materialized table as CSV, creating parent directories if needed.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(AnnotateError::from)?;

    info!(
        path = %path.display(),
        rows = table.rows.len(),
        "wrote output table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_keys_records_by_header() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "in.csv", "a,b\n1,2\n3,4\n");
        let loaded = read_table(&path).unwrap();

        assert_eq!(loaded.header, vec!["a", "b"]);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].get("a"), Some("1"));
        assert_eq!(loaded.records[1].get("b"), Some("4"));
    }

    #[test]
    fn test_read_tolerates_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "in.csv", "a,b,c\n1,2\n");
        let loaded = read_table(&path).unwrap();

        assert_eq!(loaded.records[0].get("b"), Some("2"));
        assert_eq!(loaded.records[0].get("c"), None);
    }

    #[test]
    fn test_read_empty_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "in.csv", "");
        assert!(matches!(read_table(&path), Err(AnnotateError::EmptyInput)));
    }

    #[test]
    fn test_write_quotes_embedded_delimiters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table {
            header: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec!["1,5".to_string(), "x\"y".to_string()]],
        };
        write_table(&path, &table).unwrap();

        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded.records[0].get("a"), Some("1,5"));
        assert_eq!(loaded.records[0].get("b"), Some("x\"y"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deep/out.csv");
        let table = Table {
            header: vec!["a".to_string()],
            rows: vec![],
        };
        write_table(&path, &table).unwrap();
        assert!(path.exists());
    }
}
