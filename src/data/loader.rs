use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{CloseApproach, NearEarthObject, Record};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load NEOs from a JPL small-body database CSV export.
pub fn load_neos(path: &Path) -> Result<Vec<NearEarthObject>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening NEO file {}", path.display()))?;
    let neos = read_neos(file).with_context(|| format!("loading {}", path.display()))?;
    log::info!("Loaded {} NEOs from {}", neos.len(), path.display());
    Ok(neos)
}

/// Load close approaches from a JPL close-approach data (CAD) JSON export.
pub fn load_approaches(path: &Path) -> Result<Vec<CloseApproach>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening close-approach file {}", path.display()))?;
    let approaches = read_approaches(std::io::BufReader::new(file))
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} close approaches from {}",
        approaches.len(),
        path.display()
    );
    Ok(approaches)
}

// ---------------------------------------------------------------------------
// CSV adapter
// ---------------------------------------------------------------------------

/// Source column → normalized NEO field. Other columns are ignored.
const NEO_COLUMNS: [(&str, &str); 4] = [
    ("pdes", "designation"),
    ("name", "name"),
    ("diameter", "diameter"),
    ("pha", "hazardous"),
];

/// CSV layout: header row, one NEO per row. `pdes` is required; `name`,
/// `diameter` and `pha` may be absent or empty.
pub fn read_neos<R: Read>(reader: R) -> Result<Vec<NearEarthObject>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let positions: Vec<(usize, &str)> = NEO_COLUMNS
        .iter()
        .filter_map(|(column, key)| {
            headers
                .iter()
                .position(|h| h.trim() == *column)
                .map(|idx| (idx, *key))
        })
        .collect();
    if !positions.iter().any(|(_, key)| *key == "designation") {
        anyhow::bail!("CSV missing 'pdes' column");
    }

    let mut neos = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let record: Record = positions
            .iter()
            .map(|(idx, key)| (key.to_string(), row.get(*idx).unwrap_or("").to_string()))
            .collect();
        let neo = NearEarthObject::from_record(&record)
            .with_context(|| format!("CSV row {row_no}"))?;
        neos.push(neo);
    }

    Ok(neos)
}

// ---------------------------------------------------------------------------
// JSON adapter
// ---------------------------------------------------------------------------

/// Field-indexed layout of the CAD API:
///
/// ```json
/// {
///   "fields": ["des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", ...],
///   "data": [["170903", "105", "2415020.507", "1900-Jan-01 00:11", "0.0921", ...], ...]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct CadExport {
    fields: Vec<String>,
    data: Vec<Vec<JsonValue>>,
}

/// Source field → normalized close-approach field.
const CAD_FIELDS: [(&str, &str); 4] = [
    ("des", "designation"),
    ("cd", "time"),
    ("dist", "distance"),
    ("v_rel", "velocity"),
];

pub fn read_approaches<R: Read>(reader: R) -> Result<Vec<CloseApproach>> {
    let export: CadExport = serde_json::from_reader(reader).context("parsing CAD JSON")?;

    let positions: Vec<(usize, &str)> = CAD_FIELDS
        .iter()
        .filter_map(|(field, key)| {
            export
                .fields
                .iter()
                .position(|f| f == field)
                .map(|idx| (idx, *key))
        })
        .collect();
    if !positions.iter().any(|(_, key)| *key == "designation") {
        anyhow::bail!("CAD JSON missing 'des' field");
    }

    export
        .data
        .iter()
        .enumerate()
        .map(|(row_no, row)| {
            let record: Record = positions
                .iter()
                .map(|(idx, key)| (key.to_string(), json_to_raw(row.get(*idx))))
                .collect();
            CloseApproach::from_record(&record).with_context(|| format!("CAD row {row_no}"))
        })
        .collect()
}

/// Flatten a JSON cell to the raw string form; `null` and missing cells become empty.
fn json_to_raw(val: Option<&JsonValue>) -> String {
    match val {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEOS_CSV: &str = "\
id,spkid,full_name,pdes,name,prefix,neo,pha,H,G,M1,M2,K1,K2,PC,diameter,extent,albedo
a0000433,2000433,433 Eros (A898 PA),433,Eros,,Y,N,10.4,0.46,,,,,,16.84,,0.25
a0004769,2004769,4769 Castalia (1989 PB),4769,Castalia,,Y,Y,16.9,,,,,,,,,
bK19S05F,3841473,(2019 SF5),2019 SF5,,,Y,,26.2,,,,,,,,,
";

    const CAD_JSON: &str = r#"{
        "signature": {"source": "NASA/JPL SBDB Close Approach Data API", "version": "1.1"},
        "count": "3",
        "fields": ["des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", "v_inf", "t_sigma_f", "h"],
        "data": [
            ["433", "659", "2415020.507", "1900-Dec-27 01:30", "0.15", "0.14", "0.16", "5.5", "5.4", "< 00:01", "10.4"],
            ["4769", "142", "2415020.500", "1900-Jan-01 00:00", "0.02", "0.01", "0.03", 20.0, null, "00:02", "16.9"],
            ["2019 SF5", "7", "2458754.5", null, null, null, null, null, null, null, null]
        ]
    }"#;

    #[test]
    fn test_read_neos() {
        let neos = read_neos(NEOS_CSV.as_bytes()).unwrap();

        assert_eq!(neos.len(), 3);
        assert_eq!(neos[0].designation, "433");
        assert_eq!(neos[0].name.as_deref(), Some("Eros"));
        assert_eq!(neos[0].diameter, Some(16.84));
        assert!(!neos[0].hazardous);

        assert!(neos[1].hazardous);
        assert_eq!(neos[1].diameter, None);

        assert_eq!(neos[2].designation, "2019 SF5");
        assert_eq!(neos[2].name, None);
        assert!(!neos[2].hazardous);
    }

    #[test]
    fn test_read_neos_requires_pdes_column() {
        let err = read_neos("name,diameter\nEros,16.84\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("pdes"));
    }

    #[test]
    fn test_read_neos_reports_row() {
        let csv = "pdes,name,diameter,pha\n433,Eros,16.84,N\n4769,Castalia,huge,Y\n";
        let err = read_neos(csv.as_bytes()).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("CSV row 1"), "{message}");
        assert!(message.contains("huge"), "{message}");
    }

    #[test]
    fn test_read_approaches() {
        let approaches = read_approaches(CAD_JSON.as_bytes()).unwrap();

        assert_eq!(approaches.len(), 3);
        assert_eq!(approaches[0].designation, "433");
        assert_eq!(approaches[0].time_str(), "1900-12-27 01:30");
        assert_eq!(approaches[0].distance, Some(0.15));
        assert_eq!(approaches[1].velocity, Some(20.0));

        let sparse = &approaches[2];
        assert_eq!(sparse.time, None);
        assert_eq!(sparse.distance, None);
        assert_eq!(sparse.velocity, None);
    }

    #[test]
    fn test_read_approaches_rejects_bad_distance() {
        let json = r#"{"fields": ["des", "cd", "dist", "v_rel"], "data": [["433", "1900-Dec-27 01:30", "far", "5.5"]]}"#;
        let err = read_approaches(json.as_bytes()).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("CAD row 0"), "{message}");
        assert!(message.contains("distance"), "{message}");
    }

    #[test]
    fn test_read_approaches_requires_des_field() {
        let json = r#"{"fields": ["cd"], "data": [["1900-Dec-27 01:30"]]}"#;
        assert!(read_approaches(json.as_bytes()).is_err());
    }
}
