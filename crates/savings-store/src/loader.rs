//! Tabular file loading.
//!
//! Files are comma-separated with a header row. Each data row becomes a
//! [`Record`] keyed by the header's column names, in file order.
//!
//! Rows are accepted even when their width differs from the header:
//! trailing columns missing from a short row are simply absent, and values
//! past the end of the header are keyed by their zero-based position
//! (`_5` for the sixth value).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use savings_types::Record;
use tracing::{debug, info};

use crate::error::LoadError;

const BOM: char = '\u{feff}';

/// Load every row of the file at `path`.
///
/// The file is read on tokio's blocking pool, so the calling task suspends
/// without stalling the runtime.
///
/// # Errors
///
/// - [`LoadError::NotFound`] if `path` does not exist
/// - [`LoadError::Io`] if the file cannot be opened
/// - [`LoadError::Csv`] if reading fails part-way through
pub async fn load_table(path: impl AsRef<Path>) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref().to_path_buf();
    debug!("Loading table from {}", path.display());

    let task_path = path.clone();
    let rows = tokio::task::spawn_blocking(move || read_table(&task_path)).await??;

    info!("Loaded {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Synchronous counterpart of [`load_table`].
pub fn read_table(path: &Path) -> Result<Vec<Record>, LoadError> {
    let file = File::open(path).map_err(|source| open_error(path.to_path_buf(), source))?;
    read_records(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse rows from any reader.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if index == 0 {
                name.trim_start_matches(BOM).to_string()
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut record = Record::with_capacity(row.len());
        for (index, value) in row.iter().enumerate() {
            match headers.get(index) {
                Some(column) => record.insert(column.as_str(), value),
                None => record.insert(format!("_{index}"), value),
            }
        }
        rows.push(record);
    }

    Ok(rows)
}

fn open_error(path: PathBuf, source: io::Error) -> LoadError {
    if source.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound { path }
    } else {
        LoadError::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Record> {
        read_records(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_read_records_basic() {
        let rows = parse("device_id,name\nD1,Boiler\nD2,Chiller\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("device_id"), Some("D1"));
        assert_eq!(rows[0].get("name"), Some("Boiler"));
        assert_eq!(rows[1].get("device_id"), Some("D2"));
    }

    #[test]
    fn test_read_records_preserves_header_order() {
        let rows = parse("timestamp,device_id,carbon_saved\n2024-01-05,D1,0.5\n");
        let columns: Vec<_> = rows[0].columns().collect();
        assert_eq!(columns, ["timestamp", "device_id", "carbon_saved"]);
    }

    #[test]
    fn test_read_records_header_only() {
        let rows = parse("device_id,name\n");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_records_empty_input() {
        let rows = parse("");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_records_strips_bom() {
        let rows = parse("\u{feff}device_id,name\nD1,Boiler\n");
        assert_eq!(rows[0].get("device_id"), Some("D1"));
    }

    #[test]
    fn test_read_records_short_row() {
        let rows = parse("a,b,c\n1,2\n");
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn test_read_records_long_row() {
        let rows = parse("a,b\n1,2,3\n");
        assert_eq!(rows[0].get("_2"), Some("3"));
    }

    #[test]
    fn test_read_records_quoted_values() {
        let rows = parse("device_id,name\nD1,\"Boiler, north wing\"\n");
        assert_eq!(rows[0].get("name"), Some("Boiler, north wing"));
    }

    #[test]
    fn test_read_records_values_are_not_trimmed() {
        let rows = parse("device_id,name\n D1 ,x\n");
        assert_eq!(rows[0].get("device_id"), Some(" D1 "));
    }

    #[test]
    fn test_read_records_invalid_utf8() {
        let bytes: &[u8] = b"device_id\n\xff\xfe\n";
        assert!(read_records(bytes).is_err());
    }

    #[tokio::test]
    async fn test_load_table_invalid_utf8_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savings.csv");
        std::fs::write(&path, b"device_id,timestamp\nD1,2024-01-05\nD2,\xff\xfe\n").unwrap();

        match read_table(&path) {
            Err(LoadError::Csv { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected Csv error, got {:?}", other),
        }

        match load_table(&path).await {
            Err(error @ LoadError::Csv { .. }) => {
                assert!(error.to_string().contains("savings.csv"));
            }
            other => panic!("expected Csv error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_table_missing_file() {
        let result = read_table(Path::new("/nonexistent/devices.csv"));
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.csv");
        std::fs::write(&path, "device_id,name\nD1,Boiler\n").unwrap();

        let rows = load_table(&path).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Boiler"));
    }

    #[tokio::test]
    async fn test_load_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_table(dir.path().join("absent.csv")).await;

        match result {
            Err(LoadError::NotFound { path }) => assert!(path.ends_with("absent.csv")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_error_display() {
        let error = LoadError::NotFound {
            path: PathBuf::from("/data/devices.csv"),
        };
        assert!(error.to_string().contains("/data/devices.csv"));
    }
}
