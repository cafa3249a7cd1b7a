use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_YEAR: &str = "Year";
pub const COL_LOCATION: &str = "Location";
pub const COL_POVERTY: &str = "Poverty_Incidence";
pub const COL_BIRTH_RATE: &str = "Teenage_Birth_Rate";
pub const COL_RISK_LEVEL: &str = "Risk_Level";

// ---------------------------------------------------------------------------
// RiskLevel – the optional categorical bucket
// ---------------------------------------------------------------------------

/// Combined poverty / birth-rate severity for a location-year.
///
/// Ordering is alphabetical (`High < Low < Medium`) so sorted option lists
/// match how the values appear when sorted as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    High,
    Low,
    Medium,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRiskLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => Err(UnknownRiskLevel(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub location: String,
    /// Percentage of the population below the poverty line. `None` when the
    /// cell is blank or `NaN`.
    pub poverty_incidence: Option<f64>,
    /// Percentage of births to teenage mothers. `None` when blank or `NaN`.
    pub teenage_birth_rate: Option<f64>,
    /// `None` when the dataset has no Risk_Level column, or the cell is blank.
    pub risk_level: Option<RiskLevel>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records in file order, plus the distinct values of each filterable
/// dimension. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub years: BTreeSet<i32>,
    pub locations: BTreeSet<String>,
    /// Empty when the Risk_Level column is absent.
    pub risk_levels: BTreeSet<RiskLevel>,
    has_risk_column: bool,
}

impl Dataset {
    /// Build the distinct-value indexes from the loaded records.
    pub fn from_records(records: Vec<Record>, has_risk_column: bool) -> Self {
        let mut years = BTreeSet::new();
        let mut locations = BTreeSet::new();
        let mut risk_levels = BTreeSet::new();

        for rec in &records {
            years.insert(rec.year);
            locations.insert(rec.location.clone());
            if let Some(risk) = rec.risk_level {
                risk_levels.insert(risk);
            }
        }

        Dataset {
            records,
            years,
            locations,
            risk_levels,
            has_risk_column,
        }
    }

    /// Whether the source carried a Risk_Level column. When false, risk
    /// filtering and risk colouring are no-ops.
    pub fn has_risk_level(&self) -> bool {
        self.has_risk_column
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, location: &str, risk: Option<RiskLevel>) -> Record {
        Record {
            year,
            location: location.to_string(),
            poverty_incidence: Some(10.0),
            teenage_birth_rate: Some(2.0),
            risk_level: risk,
        }
    }

    #[test]
    fn parses_risk_levels() {
        assert_eq!("Low".parse::<RiskLevel>(), Ok(RiskLevel::Low));
        assert_eq!(" High ".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(
            "Severe".parse::<RiskLevel>(),
            Err(UnknownRiskLevel("Severe".to_string()))
        );
    }

    #[test]
    fn risk_levels_sort_as_text() {
        let mut levels = vec![RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];
        levels.sort();
        let names: Vec<&str> = levels.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["High", "Low", "Medium"]);
    }

    #[test]
    fn indexes_distinct_values() {
        let ds = Dataset::from_records(
            vec![
                rec(2021, "Cebu", Some(RiskLevel::High)),
                rec(2018, "Abra", Some(RiskLevel::Low)),
                rec(2021, "Abra", Some(RiskLevel::Low)),
            ],
            true,
        );
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2018, 2021]);
        assert_eq!(
            ds.locations.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Abra", "Cebu"]
        );
        assert_eq!(ds.risk_levels.len(), 2);
        assert!(ds.has_risk_level());
    }

    #[test]
    fn dataset_without_risk_column() {
        let ds = Dataset::from_records(vec![rec(2023, "Abra", None)], false);
        assert!(!ds.has_risk_level());
        assert!(ds.risk_levels.is_empty());
    }
}
