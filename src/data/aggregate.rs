use std::collections::BTreeMap;

use super::model::Record;

/// Running mean over the present values of one column.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline metrics over the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub avg_poverty: f64,
    pub avg_birth_rate: f64,
    pub count: usize,
}

/// Mean of both percentages plus the row count. Each mean skips missing
/// cells in its own column; a column with no values averages to zero, so the
/// metrics always render as numbers. `count` is the number of rows.
pub fn summarize<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Summary {
    let mut poverty = Mean::default();
    let mut birth = Mean::default();
    let mut count = 0usize;

    for rec in rows {
        poverty.push(rec.poverty_incidence);
        birth.push(rec.teenage_birth_rate);
        count += 1;
    }

    Summary {
        avg_poverty: poverty.value().unwrap_or(0.0),
        avg_birth_rate: birth.value().unwrap_or(0.0),
        count,
    }
}

// ---------------------------------------------------------------------------
// Per-year trend
// ---------------------------------------------------------------------------

/// Averages for one year. `None` when every cell of that column is missing
/// for the year; the chart leaves the point out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub avg_poverty: Option<f64>,
    pub avg_birth_rate: Option<f64>,
}

/// Group rows by year and average both percentages, ascending by year.
pub fn trend<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<i32, (Mean, Mean)> = BTreeMap::new();
    for rec in rows {
        let entry = groups.entry(rec.year).or_default();
        entry.0.push(rec.poverty_incidence);
        entry.1.push(rec.teenage_birth_rate);
    }

    groups
        .into_iter()
        .map(|(year, (poverty, birth))| TrendPoint {
            year,
            avg_poverty: poverty.value(),
            avg_birth_rate: birth.value(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Provincial comparison (bar chart)
// ---------------------------------------------------------------------------

/// Minimum pixel height of the horizontal bar chart.
pub const MIN_BAR_CHART_HEIGHT: f32 = 500.0;
/// Extra pixels per distinct location in the horizontal bar chart.
pub const BAR_HEIGHT_PER_LOCATION: f32 = 25.0;

/// Height for a horizontal bar chart with `num_locations` categories.
pub fn bar_chart_height(num_locations: usize) -> f32 {
    MIN_BAR_CHART_HEIGHT.max(num_locations as f32 * BAR_HEIGHT_PER_LOCATION)
}

/// One stacked segment: a visible row and its Teenage_Birth_Rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub record: &'a Record,
    pub value: f64,
}

/// One category of the bar chart: every visible row for a location, stacked.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationBar<'a> {
    pub location: &'a str,
    /// Sum of Teenage_Birth_Rate over `segments`.
    pub total: f64,
    /// Segments in file order.
    pub segments: Vec<Segment<'a>>,
}

/// Group rows by location, sorted ascending by stacked total (ties by name).
/// Rows with a missing Teenage_Birth_Rate have no segment to draw and are
/// skipped; a location left with none gets no bar.
pub fn location_bars<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Vec<LocationBar<'a>> {
    let mut by_location: BTreeMap<&'a str, Vec<Segment<'a>>> = BTreeMap::new();
    for record in rows {
        let Some(value) = record.teenage_birth_rate else {
            continue;
        };
        by_location
            .entry(record.location.as_str())
            .or_default()
            .push(Segment { record, value });
    }

    let mut bars: Vec<LocationBar<'a>> = by_location
        .into_iter()
        .map(|(location, segments)| LocationBar {
            location,
            total: segments.iter().map(|s| s.value).sum(),
            segments,
        })
        .collect();

    // BTreeMap iteration already ordered by name, and the sort is stable.
    bars.sort_by(|a, b| a.total.total_cmp(&b.total));
    bars
}
