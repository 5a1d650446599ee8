use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::LinkedApproach;
use crate::error::Error;

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 7] = [
    "datetime_utc",
    "distance_au",
    "velocity_km_s",
    "designation",
    "name",
    "diameter_km",
    "potentially_hazardous",
];

/// Write results to `path`, choosing the format by extension (`.csv` / `.json`).
/// Returns the number of close approaches written.
pub fn write_results<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || -> Result<BufWriter<std::fs::File>> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating output file {}", path.display()))?;
        Ok(BufWriter::new(file))
    };

    let written = match ext.as_str() {
        "csv" => write_to_csv(results, open()?),
        "json" => write_to_json(results, open()?),
        other => return Err(Error::UnsupportedOutput(format!(".{other}")).into()),
    }
    .with_context(|| format!("writing {}", path.display()))?;

    log::info!("Wrote {written} close approaches to {}", path.display());
    Ok(written)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    datetime_utc: String,
    distance_au: String,
    velocity_km_s: String,
    designation: &'a str,
    name: &'a str,
    diameter_km: String,
    potentially_hazardous: &'static str,
}

fn number_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "nan".to_string(),
    }
}

/// One row per close approach joined with its NEO. The header is always
/// written, even for an empty result. Unnamed NEOs are written as `None` and
/// unknown numbers as `nan`.
pub fn write_to_csv<'a, I, W>(results: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
    W: Write,
{
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(CSV_HEADER).context("writing CSV header")?;

    let mut written = 0;
    for ca in results {
        let neo = ca.neo();
        let row = CsvRow {
            datetime_utc: ca.time_str(),
            distance_au: number_cell(ca.distance),
            velocity_km_s: number_cell(ca.velocity),
            designation: &neo.designation,
            name: neo.name.as_deref().unwrap_or("None"),
            diameter_km: number_cell(neo.diameter),
            potentially_hazardous: if neo.hazardous { "True" } else { "False" },
        };
        out.serialize(&row)
            .with_context(|| format!("writing CSV row for {}", neo.designation))?;
        written += 1;
    }

    out.flush().context("flushing CSV output")?;
    Ok(written)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// A JSON array of serialized close approaches, each with a nested `neo` object.
pub fn write_to_json<'a, I, W>(results: I, mut writer: W) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
    W: Write,
{
    let records: Vec<_> = results.into_iter().map(|ca| ca.serialize()).collect();

    serde_json::to_writer_pretty(&mut writer, &records).context("serializing JSON")?;
    writeln!(writer).context("writing JSON output")?;
    writer.flush().context("flushing JSON output")?;
    Ok(records.len())
}
