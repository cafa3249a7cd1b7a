use std::collections::BTreeSet;

use super::model::{Dataset, Record, RiskLevel};

// ---------------------------------------------------------------------------
// FilterSelection: which values are selected per dimension
// ---------------------------------------------------------------------------

/// The user's current choice for each filter dimension.
///
/// Semantics are deliberately asymmetric:
/// * `years` / `risk_levels` empty → no row passes
/// * `locations` empty → no location constraint (every location passes)
///
/// `risk_levels` is ignored entirely when the dataset has no Risk_Level column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub locations: BTreeSet<String>,
    pub risk_levels: BTreeSet<RiskLevel>,
}

impl FilterSelection {
    /// Every available value selected in every dimension.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            years: dataset.years.clone(),
            locations: dataset.locations.clone(),
            risk_levels: dataset.risk_levels.clone(),
        }
    }

    /// Every year and risk level, but only the first `limit` locations in
    /// sort order (`None` selects them all).
    pub fn with_location_limit(dataset: &Dataset, limit: Option<usize>) -> Self {
        let mut selection = Self::all(dataset);
        if let Some(n) = limit {
            selection.locations = dataset.locations.iter().take(n).cloned().collect();
        }
        selection
    }

    /// Whether `record` passes every active filter of this selection.
    pub fn matches(&self, dataset: &Dataset, record: &Record) -> bool {
        if !self.years.contains(&record.year) {
            return false;
        }
        if dataset.has_risk_level() {
            // A blank risk cell never matches a selection, like a missing value.
            match record.risk_level {
                Some(risk) if self.risk_levels.contains(&risk) => {}
                _ => return false,
            }
        }
        self.locations.is_empty() || self.locations.contains(&record.location)
    }
}

// ---------------------------------------------------------------------------
// FilteredView: the rows passing the current selection
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] that pass a [`FilterSelection`], in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    indices: Vec<usize>,
    rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    /// Rebuild a view from indices previously taken from [`FilteredView::indices`].
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        let rows = indices.iter().map(|&i| &dataset.records[i]).collect();
        Self { indices, rows }
    }

    /// Positions of the visible rows in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct locations among the visible rows.
    pub fn distinct_locations(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.location.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(dataset, rec))
        .map(|(i, _)| i)
        .collect()
}

/// Compute the view of `dataset` under `selection`. Pure: the same inputs
/// always yield the same rows.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView::from_indices(dataset, filtered_indices(dataset, selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, location: &str, poverty: f64, birth: f64, risk: Option<RiskLevel>) -> Record {
        Record {
            year,
            location: location.to_string(),
            poverty_incidence: Some(poverty),
            teenage_birth_rate: Some(birth),
            risk_level: risk,
        }
    }

    fn two_row_dataset() -> Dataset {
        Dataset::from_records(
            vec![
                rec(2018, "A", 20.0, 5.0, Some(RiskLevel::Low)),
                rec(2021, "B", 40.0, 10.0, Some(RiskLevel::High)),
            ],
            true,
        )
    }

    fn mixed_dataset() -> Dataset {
        Dataset::from_records(
            vec![
                rec(2018, "Abra", 10.0, 1.0, Some(RiskLevel::Low)),
                rec(2018, "Cebu", 30.0, 3.0, Some(RiskLevel::Medium)),
                rec(2021, "Abra", 50.0, 5.0, Some(RiskLevel::High)),
                rec(2021, "Davao", 20.0, 2.0, Some(RiskLevel::Low)),
                rec(2023, "Cebu", 25.0, 2.5, Some(RiskLevel::Medium)),
                rec(2023, "Davao", 45.0, 4.5, None),
            ],
            true,
        )
    }

    const ALL_RISKS: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    fn selection(years: &[i32], locations: &[&str], risks: &[RiskLevel]) -> FilterSelection {
        FilterSelection {
            years: years.iter().copied().collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
            risk_levels: risks.iter().copied().collect(),
        }
    }

    #[test]
    fn empty_locations_means_no_location_filter() {
        let ds = two_row_dataset();
        let sel = selection(&[2018, 2021], &[], &[RiskLevel::Low, RiskLevel::High]);
        let view = filter(&ds, &sel);
        assert_eq!(view.len(), 2);
        assert_eq!(view.rows()[0].location, "A");
        assert_eq!(view.rows()[1].location, "B");
    }

    #[test]
    fn location_filter_can_exclude_every_row() {
        let ds = two_row_dataset();
        let sel = selection(&[2018], &["B"], &[RiskLevel::Low, RiskLevel::High]);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn empty_years_yields_empty_view() {
        let ds = mixed_dataset();
        let sel = selection(&[], &[], &ALL_RISKS);
        assert!(filter(&ds, &sel).is_empty());

        let sel = selection(&[], &["Abra", "Cebu"], &ALL_RISKS);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn empty_risk_levels_yields_empty_view() {
        let ds = mixed_dataset();
        let sel = selection(&[2018, 2021, 2023], &[], &[]);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn year_and_risk_ignore_location_when_unset() {
        let ds = mixed_dataset();
        let sel = selection(&[2018, 2023], &[], &[RiskLevel::Medium]);
        let view = filter(&ds, &sel);
        let expected: Vec<&Record> = ds
            .records
            .iter()
            .filter(|r| {
                (r.year == 2018 || r.year == 2023) && r.risk_level == Some(RiskLevel::Medium)
            })
            .collect();
        assert_eq!(view.rows(), expected.as_slice());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let ds = mixed_dataset();
        let sel = selection(&[2021], &["Abra", "Cebu"], &ALL_RISKS);
        let view = filter(&ds, &sel);
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].location, "Abra");
        assert_eq!(view.rows()[0].year, 2021);
    }

    #[test]
    fn blank_risk_cell_never_matches() {
        let ds = mixed_dataset();
        let sel = selection(&[2023], &["Davao"], &ALL_RISKS);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn risk_filter_is_noop_without_risk_column() {
        let ds = Dataset::from_records(
            vec![rec(2018, "A", 20.0, 5.0, None), rec(2021, "B", 40.0, 10.0, None)],
            false,
        );
        let sel = selection(&[2018, 2021], &[], &[]);
        assert_eq!(filter(&ds, &sel).len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = mixed_dataset();
        let sel = selection(&[2018, 2021], &["Abra", "Davao"], &[RiskLevel::Low, RiskLevel::High]);
        let first = filter(&ds, &sel);
        let second = filter(&ds, &sel);
        assert_eq!(first, second);
        assert_eq!(first.indices(), &[0, 2, 3]);
    }

    #[test]
    fn default_selection_passes_everything_with_a_risk_level() {
        let ds = mixed_dataset();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn location_limit_takes_first_in_sort_order() {
        let ds = mixed_dataset();
        let sel = FilterSelection::with_location_limit(&ds, Some(2));
        assert_eq!(
            sel.locations.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Abra", "Cebu"]
        );
        assert_eq!(sel.years.len(), 3);

        let all = FilterSelection::with_location_limit(&ds, None);
        assert_eq!(all.locations.len(), 3);
    }

    #[test]
    fn counts_distinct_locations_in_view() {
        let ds = mixed_dataset();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.distinct_locations(), 3);
    }
}
