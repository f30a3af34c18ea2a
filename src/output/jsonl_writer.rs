//! JSON Lines (JSONL) output writer.
//!
//! One bin per line, which keeps large bin counts easy to stream into
//! plotting tools and dataframes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::histogram::Distribution;
use crate::output::bin_rows;

/// Writes histogram bins to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"start":"2021-01-01T10:00:00Z","end":"2021-01-01T10:05:00Z","count":1,"density":0.9312}
/// {"start":"2021-01-01T10:05:00Z","end":"2021-01-01T10:10:00Z","count":2,"density":1.1764}
/// ```
///
/// An empty distribution writes an empty file.
pub fn write_jsonl(distribution: &Distribution, output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(&mut writer, distribution)?;
    writer.flush()?;
    Ok(())
}

/// Converts histogram bins to a JSONL string.
///
/// Same format as [`write_jsonl`], but returns a String instead of writing
/// to a file.
pub fn to_jsonl(distribution: &Distribution) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(&mut buffer, distribution)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_lines<W: Write>(out: &mut W, distribution: &Distribution) -> Result<()> {
    let Some(histogram) = distribution.histogram() else {
        return Ok(());
    };

    for row in bin_rows(histogram) {
        serde_json::to_writer(&mut *out, &row)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
