use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{
    Dataset, Record, RiskLevel, COL_BIRTH_RATE, COL_LOCATION, COL_POVERTY, COL_RISK_LEVEL,
    COL_YEAR,
};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Memoized loader
// ---------------------------------------------------------------------------

/// Process-wide memo of the loaded dataset.
///
/// The file is read on the first successful [`DatasetCache::load`]; every later
/// call hands out the same table without touching storage. There is no
/// invalidation: the dataset lives until the process exits. Failed loads are
/// not cached.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceLock<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<Dataset>> {
        if let Some(ds) = self.cell.get() {
            log::debug!("Dataset cache hit for {}", self.path.display());
            return Ok(Arc::clone(ds));
        }

        let dataset = load_file(&self.path)?;
        if dataset.is_empty() {
            log::warn!("{} contains no records", self.path.display());
        }
        log::info!(
            "Loaded {} records from {} ({} years, {} locations, risk column: {})",
            dataset.len(),
            self.path.display(),
            dataset.years.len(),
            dataset.locations.len(),
            dataset.has_risk_level()
        );
        Ok(Arc::clone(self.cell.get_or_init(|| Arc::new(dataset))))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Year, Location, Poverty_Incidence,
///   Teenage_Birth_Rate` and optionally `Risk_Level`
/// * `.parquet` – the same columns, any numeric/string Arrow types that cast
///   cleanly
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(DashboardError::DataNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DashboardError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV line as text; parsing happens afterwards so failures can name
/// the row and column.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Poverty_Incidence")]
    poverty_incidence: String,
    #[serde(rename = "Teenage_Birth_Rate")]
    teenage_birth_rate: String,
    #[serde(rename = "Risk_Level", default)]
    risk_level: Option<String>,
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in [COL_YEAR, COL_LOCATION, COL_POVERTY, COL_BIRTH_RATE] {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    let has_risk_column = headers.iter().any(|h| h == COL_RISK_LEVEL);

    let mut records = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        records.push(Record {
            year: parse_year(&row.year, row_no)?,
            location: row.location,
            poverty_incidence: parse_percentage(&row.poverty_incidence, row_no, COL_POVERTY)?,
            teenage_birth_rate: parse_percentage(&row.teenage_birth_rate, row_no, COL_BIRTH_RATE)?,
            risk_level: parse_risk(row.risk_level.as_deref().unwrap_or(""), row_no)?,
        });
    }

    Ok(Dataset::from_records(records, has_risk_column))
}

/// Years are usually written as integers, but a float column written by a
/// dataframe library (`2018.0`) is accepted as long as it is integral.
fn parse_year(s: &str, row: usize) -> Result<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    s.parse::<f64>()
        .map_err(|_| DashboardError::invalid(row, COL_YEAR, s))
        .and_then(|f| float_year(f, row))
}

/// Blank cells and `NaN` both mean "no value"; anything else must parse.
fn parse_percentage(s: &str, row: usize, column: &str) -> Result<Option<f64>> {
    let s = s.trim();
    let number = s.trim_end_matches('%').trim();
    if number.is_empty() {
        return Ok(None);
    }
    number
        .parse::<f64>()
        .map(|v| (!v.is_nan()).then_some(v))
        .map_err(|_| DashboardError::invalid(row, column, s))
}

/// Integral-valued float years only; `2018.7` is not a survey year.
fn float_year(v: f64, row: usize) -> Result<i32> {
    if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 {
        Ok(v as i32)
    } else {
        Err(DashboardError::invalid(row, COL_YEAR, v.to_string()))
    }
}

fn parse_risk(s: &str, row: usize) -> Result<Option<RiskLevel>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<RiskLevel>()
        .map(Some)
        .map_err(|e| DashboardError::invalid(row, COL_RISK_LEVEL, e.0))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file carrying the same columns as the CSV layout.
///
/// Columns are cast to canonical Arrow types first (`Float64` for Year and
/// the percentages, `Utf8` for text), so files written by Pandas or Polars
/// with narrower or wider types load the same way.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let has_risk_column = builder.schema().index_of(COL_RISK_LEVEL).is_ok();
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let column = |name: &str, to: &DataType| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| DashboardError::MissingColumn {
                    column: name.to_string(),
                })?;
            Ok(cast(batch.column(idx), to)?)
        };

        let years = column(COL_YEAR, &DataType::Float64)?;
        let locations = column(COL_LOCATION, &DataType::Utf8)?;
        let poverty = column(COL_POVERTY, &DataType::Float64)?;
        let births = column(COL_BIRTH_RATE, &DataType::Float64)?;
        let risks = match schema.index_of(COL_RISK_LEVEL) {
            Ok(idx) => Some(cast(batch.column(idx), &DataType::Utf8)?),
            Err(_) => None,
        };

        let years = years.as_primitive::<Float64Type>();
        let locations = locations.as_string::<i32>();
        let poverty = poverty.as_primitive::<Float64Type>();
        let births = births.as_primitive::<Float64Type>();
        let risks = risks.as_ref().map(|r| r.as_string::<i32>());

        let offset = records.len();
        for row in 0..batch.num_rows() {
            let row_no = offset + row;

            if years.is_null(row) {
                return Err(DashboardError::invalid(row_no, COL_YEAR, "<null>"));
            }
            let year = float_year(years.value(row), row_no)?;

            let location = if locations.is_null(row) {
                String::new()
            } else {
                locations.value(row).trim().to_string()
            };

            let numeric = |arr: &arrow::array::Float64Array| {
                (!arr.is_null(row) && !arr.value(row).is_nan()).then(|| arr.value(row))
            };

            let risk_level = match risks {
                Some(arr) if !arr.is_null(row) => parse_risk(arr.value(row).trim(), row_no)?,
                _ => None,
            };

            records.push(Record {
                year,
                location,
                poverty_incidence: numeric(poverty),
                teenage_birth_rate: numeric(births),
                risk_level,
            });
        }
    }

    Ok(Dataset::from_records(records, has_risk_column))
}
