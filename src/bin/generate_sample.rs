use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const YEARS: [i64; 3] = [2018, 2021, 2023];

const LOCATIONS: [&str; 24] = [
    "Abra", "Agusan del Norte", "Aklan", "Albay", "Antique", "Aurora", "Basilan", "Bataan",
    "Batangas", "Benguet", "Bohol", "Bukidnon", "Bulacan", "Cagayan", "Camarines Sur", "Capiz",
    "Cebu", "Davao del Sur", "Ilocos Norte", "Iloilo", "Leyte", "Negros Occidental", "Palawan",
    "Sulu",
];

struct Row {
    year: i64,
    location: &'static str,
    poverty: f64,
    birth_rate: f64,
    risk: &'static str,
}

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Bucket a location-year by its combined severity.
fn risk_level(poverty: f64, birth_rate: f64) -> &'static str {
    let score = poverty / 2.0 + birth_rate;
    if score >= 25.0 {
        "High"
    } else if score >= 15.0 {
        "Medium"
    } else {
        "Low"
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::with_capacity(YEARS.len() * LOCATIONS.len());

    for &location in &LOCATIONS {
        // Each location keeps a baseline; later survey rounds drift downwards.
        let base_poverty = rng.gauss(22.0, 10.0).clamp(3.0, 60.0);
        for (round, &year) in YEARS.iter().enumerate() {
            let poverty = round1(
                (base_poverty - round as f64 * 2.5 + rng.gauss(0.0, 2.0)).clamp(1.0, 70.0),
            );
            let birth_rate =
                round1((2.0 + poverty * 0.25 + rng.gauss(0.0, 1.5)).clamp(0.5, 30.0));
            rows.push(Row {
                year,
                location,
                poverty,
                birth_rate,
                risk: risk_level(poverty, birth_rate),
            });
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "Year",
        "Location",
        "Poverty_Incidence",
        "Teenage_Birth_Rate",
        "Risk_Level",
    ])?;
    for row in rows {
        writer.write_record([
            row.year.to_string(),
            row.location.to_string(),
            row.poverty.to_string(),
            row.birth_rate.to_string(),
            row.risk.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Year", DataType::Int64, false),
        Field::new("Location", DataType::Utf8, false),
        Field::new("Poverty_Incidence", DataType::Float64, false),
        Field::new("Teenage_Birth_Rate", DataType::Float64, false),
        Field::new("Risk_Level", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.location))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.poverty))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.birth_rate))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.risk))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "teenage_pregnancy_poverty_merged.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));

    if is_parquet {
        write_parquet(path, &rows)?;
    } else {
        write_csv(path, &rows)?;
    }

    log::info!("Wrote {} records to {}", rows.len(), path.display());
    println!(
        "Wrote {} records ({} locations × {} survey years) to {output}",
        rows.len(),
        LOCATIONS.len(),
        YEARS.len()
    );
    Ok(())
}
