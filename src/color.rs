use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Dataset, Record, RiskLevel};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colours for the risk buckets.
pub fn risk_color(risk: RiskLevel) -> Color32 {
    match risk {
        RiskLevel::Low => Color32::from_rgb(0, 128, 0),
        RiskLevel::Medium => Color32::from_rgb(255, 165, 0),
        RiskLevel::High => Color32::from_rgb(255, 0, 0),
    }
}

// ---------------------------------------------------------------------------
// Series key: what a point/bar is coloured and grouped by
// ---------------------------------------------------------------------------

/// Colour grouping of a record: its risk bucket when the dataset has one,
/// otherwise its survey year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeriesKey {
    Risk(RiskLevel),
    Year(i32),
    /// Blank risk cell in a dataset that has the column.
    Unknown,
}

impl SeriesKey {
    pub fn label(&self) -> String {
        match self {
            SeriesKey::Risk(r) => r.to_string(),
            SeriesKey::Year(y) => y.to_string(),
            SeriesKey::Unknown => "<none>".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Color mapping: series key → Color32
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ColorMap {
    by_risk: bool,
    year_colors: BTreeMap<i32, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Colour by risk when the dataset carries the column, else by year with
    /// a generated palette over the distinct years.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self::new(dataset.has_risk_level(), &dataset.years)
    }

    pub fn new(by_risk: bool, years: &BTreeSet<i32>) -> Self {
        let year_colors = years
            .iter()
            .copied()
            .zip(generate_palette(years.len()))
            .collect();

        ColorMap {
            by_risk,
            year_colors,
            default_color: Color32::GRAY,
        }
    }

    pub fn colors_by_risk(&self) -> bool {
        self.by_risk
    }

    /// Column name shown in legends.
    pub fn column_label(&self) -> &'static str {
        if self.by_risk {
            "Risk_Level"
        } else {
            "Year"
        }
    }

    pub fn key_for(&self, record: &Record) -> SeriesKey {
        if self.by_risk {
            record.risk_level.map_or(SeriesKey::Unknown, SeriesKey::Risk)
        } else {
            SeriesKey::Year(record.year)
        }
    }

    pub fn color_for_key(&self, key: SeriesKey) -> Color32 {
        match key {
            SeriesKey::Risk(r) => risk_color(r),
            SeriesKey::Year(y) => self
                .year_colors
                .get(&y)
                .copied()
                .unwrap_or(self.default_color),
            SeriesKey::Unknown => self.default_color,
        }
    }

    pub fn color_for(&self, record: &Record) -> Color32 {
        self.color_for_key(self.key_for(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, risk: Option<RiskLevel>) -> Record {
        Record {
            year,
            location: "Abra".to_string(),
            poverty_incidence: Some(1.0),
            teenage_birth_rate: Some(1.0),
            risk_level: risk,
        }
    }

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn risk_colors_are_fixed() {
        let years: BTreeSet<i32> = [2018].into_iter().collect();
        let cm = ColorMap::new(true, &years);
        assert_eq!(cm.color_for(&rec(2018, Some(RiskLevel::Low))), risk_color(RiskLevel::Low));
        assert_eq!(
            cm.color_for(&rec(2018, Some(RiskLevel::High))),
            Color32::from_rgb(255, 0, 0)
        );
        assert_eq!(cm.color_for(&rec(2018, None)), Color32::GRAY);
        assert_eq!(cm.column_label(), "Risk_Level");
    }

    #[test]
    fn colors_by_year_without_risk_column() {
        let years: BTreeSet<i32> = [2018, 2021, 2023].into_iter().collect();
        let cm = ColorMap::new(false, &years);
        assert_eq!(cm.key_for(&rec(2021, Some(RiskLevel::High))), SeriesKey::Year(2021));
        assert_ne!(cm.color_for(&rec(2018, None)), cm.color_for(&rec(2023, None)));
        assert_eq!(cm.color_for(&rec(1999, None)), Color32::GRAY);
    }
}
