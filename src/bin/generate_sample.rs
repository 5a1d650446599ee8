//! Write a small synthetic `neos.csv` + `cad.json` pair in the JPL export layouts.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (default `data/`).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::json;

use rusty_neo::data::model::CAD_TIME_FORMAT;

const NEO_COUNT: usize = 200;
const APPROACH_COUNT: usize = 2000;

const NAMES: [&str; 12] = [
    "Eros", "Castalia", "Apophis", "Bennu", "Toutatis", "Geographos",
    "Icarus", "Phaethon", "Ryugu", "Itokawa", "Didymos", "Florence",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

struct SampleNeo {
    pdes: String,
    name: Option<&'static str>,
    diameter: Option<f64>,
    pha: &'static str,
}

fn generate_neos(rng: &mut SimpleRng) -> Vec<SampleNeo> {
    (0..NEO_COUNT)
        .map(|i| {
            let name = if i < NAMES.len() { Some(NAMES[i]) } else { None };
            let diameter = (rng.next_f64() < 0.6).then(|| rng.range(0.01, 20.0));
            let pha = match rng.next_f64() {
                p if p < 0.15 => "Y",
                p if p < 0.95 => "N",
                _ => "",
            };
            SampleNeo {
                pdes: (1000 + i * 7).to_string(),
                name,
                diameter,
                pha,
            }
        })
        .collect()
}

fn write_neos(path: &Path, neos: &[SampleNeo]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["id", "pdes", "name", "pha", "diameter"])?;
    for neo in neos {
        let diameter = neo.diameter.map(|d| format!("{d:.3}")).unwrap_or_default();
        writer.write_record([
            format!("a{:0>7}", neo.pdes),
            neo.pdes.clone(),
            neo.name.unwrap_or("").to_string(),
            neo.pha.to_string(),
            diameter,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn generate_approaches(rng: &mut SimpleRng, neos: &[SampleNeo]) -> Result<Vec<serde_json::Value>> {
    let mut rows = Vec::with_capacity(APPROACH_COUNT);
    for _ in 0..APPROACH_COUNT {
        let neo = &neos[rng.below(neos.len())];
        let year = 1900 + rng.below(300) as i32;
        let day = 1 + rng.below(365) as u32;
        let time = NaiveDate::from_yo_opt(year, day)
            .and_then(|d| d.and_hms_opt(rng.below(24) as u32, rng.below(60) as u32, 0))
            .context("generating approach time")?;
        // Log-uniform between 1e-4 and 0.5 au
        let dist = 10f64.powf(rng.range(-4.0, -0.3));
        let v_rel = rng.range(1.0, 40.0);
        rows.push((time, neo.pdes.clone(), dist, v_rel));
    }
    rows.sort_by_key(|(time, ..)| *time);

    Ok(rows
        .into_iter()
        .map(|(time, pdes, dist, v_rel)| {
            json!([
                pdes,
                "1",
                time.format(CAD_TIME_FORMAT).to_string(),
                format!("{dist:.6}"),
                format!("{v_rel:.4}"),
            ])
        })
        .collect())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let neos = generate_neos(&mut rng);
    let approaches = generate_approaches(&mut rng, &neos)?;

    let neo_path = out_dir.join("neos.csv");
    write_neos(&neo_path, &neos)?;

    let cad_path = out_dir.join("cad.json");
    let count = approaches.len();
    let cad = json!({
        "signature": {"source": "rusty-neo synthetic sample", "version": "1.0"},
        "count": count.to_string(),
        "fields": ["des", "orbit_id", "cd", "dist", "v_rel"],
        "data": approaches,
    });
    let file = std::fs::File::create(&cad_path)
        .with_context(|| format!("creating {}", cad_path.display()))?;
    let mut out = std::io::BufWriter::new(file);
    serde_json::to_writer(&mut out, &cad)?;
    out.flush()?;

    println!(
        "Wrote {} NEOs to {} and {} close approaches to {}",
        neos.len(),
        neo_path.display(),
        count,
        cad_path.display()
    );
    Ok(())
}
