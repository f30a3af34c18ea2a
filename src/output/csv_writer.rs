//! CSV output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ChathistoError, Result};
use crate::histogram::Distribution;
use crate::output::bin_rows;

const HEADER: [&str; 4] = ["BinStart", "BinEnd", "Count", "Density"];

/// Writes histogram bins to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `BinStart`, `BinEnd`, `Count`, `Density`
/// - Dates: RFC 3339; density is empty when it couldn't be estimated
/// - An empty distribution writes the header only
pub fn write_csv(distribution: &Distribution, output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut out = write_rows(BufWriter::new(file), distribution)?;
    out.flush()?;
    Ok(())
}

/// Converts histogram bins to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing
/// to a file.
pub fn to_csv(distribution: &Distribution) -> Result<String> {
    let bytes = write_rows(Vec::new(), distribution)?;
    Ok(String::from_utf8(bytes)?)
}

fn write_rows<W: Write>(out: W, distribution: &Distribution) -> Result<W> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    writer.write_record(HEADER)?;

    if let Some(histogram) = distribution.histogram() {
        for row in bin_rows(histogram) {
            writer.write_record([
                row.start,
                row.end,
                row.count.to_string(),
                row.density.map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| ChathistoError::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_to_csv_basic() {
        let distribution =
            Distribution::from_timestamps(&[1609495200, 1609495500, 1609495800], 2).unwrap();
        let csv = to_csv(&distribution).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "BinStart;BinEnd;Count;Density");
        assert!(lines[1].starts_with("2021-01-01T10:00:00Z;2021-01-01T10:05:00Z;1;"));
        assert!(lines[2].starts_with("2021-01-01T10:05:00Z;2021-01-01T10:10:00Z;2;"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_to_csv_no_density_for_single_value() {
        let distribution = Distribution::from_timestamps(&[1609495200], 1).unwrap();
        let csv = to_csv(&distribution).unwrap();
        assert!(csv.contains("2021-01-01T10:00:00Z;2021-01-01T10:00:01Z;1;\n"));
    }

    #[test]
    fn test_to_csv_no_data() {
        let csv = to_csv(&Distribution::NoData).unwrap();
        assert_eq!(csv, "BinStart;BinEnd;Count;Density\n");
    }

    #[test]
    fn test_write_csv_file() {
        let distribution = Distribution::from_timestamps(&[0, 60, 120], 3).unwrap();
        let temp_file = NamedTempFile::new().unwrap();

        write_csv(&distribution, temp_file.path()).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(temp_file.path())
            .unwrap();
        let counts: Vec<usize> = reader
            .records()
            .map(|r| r.unwrap()[2].parse().unwrap())
            .collect();
        assert_eq!(counts, [1, 1, 1]);
    }
}
