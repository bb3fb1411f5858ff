//! CSV input and output.
//!
//! Every input file carries a header row, which is consumed and discarded;
//! columns are positional. Output files are written header-first.

use std::path::Path;

use anyhow::{Context, Result};

/// Read all data rows from a CSV file, consuming the mandatory header.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("bad CSV record at data row {}", index + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Write a header row followed by data rows.
pub fn write_records<R, F>(path: &Path, header: &[&str], rows: R) -> Result<usize>
where
    R: IntoIterator<Item = F>,
    F: IntoIterator<Item = String>,
{
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(header)?;
    let mut count = 0;
    for row in rows {
        writer.write_record(row)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_positionally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams.csv");

        write_records(
            &path,
            &["team", "email"],
            vec![
                vec!["Avionics".to_string(), "ada@example.com".to_string()],
                vec!["Propulsion".to_string(), "grace@example.com".to_string()],
            ],
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Avionics", "ada@example.com"]);
        assert_eq!(rows[1][1], "grace@example.com");
    }

    #[test]
    fn header_is_not_a_data_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only_header.csv");
        std::fs::write(&path, "team,email\n").unwrap();
        assert!(read_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_rows(Path::new("/nonexistent/input.csv")).is_err());
    }
}
