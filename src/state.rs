use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::{BarOrientation, DashboardConfig, LocationDefault};
use crate::data::aggregate::{summarize, trend, Summary, TrendPoint};
use crate::data::filter::{filter, FilterSelection, FilteredView};
use crate::data::loader::DatasetCache;
use crate::data::model::{Dataset, RiskLevel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A filterable dimension of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Location,
    RiskLevel,
}

/// The full UI session state, independent of rendering.
///
/// The selection is the only thing the user mutates; everything below it is
/// re-derived from (dataset, selection) after each change.
pub struct AppState {
    /// Shared, immutable dataset (None when loading failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Fatal load error. When set, nothing but the message is rendered.
    pub load_error: Option<String>,

    /// Current filter choice.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Headline metrics over the visible rows (cached).
    pub summary: Summary,

    /// Per-year averages over the visible rows (cached).
    pub trend: Vec<TrendPoint>,

    /// Colouring of points and bars.
    pub color_map: Option<ColorMap>,

    pub bar_orientation: BarOrientation,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            load_error: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            summary: Summary::default(),
            trend: Vec::new(),
            color_map: None,
            bar_orientation: BarOrientation::default(),
        }
    }
}

impl AppState {
    /// Load the dataset through the cache and derive the initial view.
    pub fn from_cache(cache: &DatasetCache, config: &DashboardConfig) -> Self {
        let mut state = Self {
            bar_orientation: config.bar_orientation,
            ..Self::default()
        };

        match cache.load() {
            Ok(dataset) => state.set_dataset(dataset, config.location_default),
            Err(e) => {
                log::error!("Failed to load {}: {e}", cache.path().display());
                state.load_error = Some(e.to_string());
            }
        }
        state
    }

    /// Ingest a loaded dataset, initialise selection and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, location_default: LocationDefault) {
        self.selection = FilterSelection::with_location_limit(&dataset, location_default.limit());
        self.color_map = Some(ColorMap::for_dataset(&dataset));
        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    /// Recompute the visible rows and every aggregate after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };

        let view = filter(ds, &self.selection);
        self.summary = summarize(view.iter());
        self.trend = trend(view.iter());
        self.visible_indices = view.indices().to_vec();

        log::debug!(
            "Refiltered: {} years, {} locations, {} risk levels selected → {} rows",
            self.selection.years.len(),
            self.selection.locations.len(),
            self.selection.risk_levels.len(),
            self.visible_indices.len()
        );
    }

    /// The rows currently passing the filters.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::from_indices(ds, self.visible_indices.clone()))
    }

    pub fn set_year(&mut self, year: i32, selected: bool) {
        if selected {
            self.selection.years.insert(year);
        } else {
            self.selection.years.remove(&year);
        }
        self.refilter();
    }

    pub fn set_location(&mut self, location: &str, selected: bool) {
        if selected {
            self.selection.locations.insert(location.to_string());
        } else {
            self.selection.locations.remove(location);
        }
        self.refilter();
    }

    pub fn set_risk_level(&mut self, risk: RiskLevel, selected: bool) {
        if selected {
            self.selection.risk_levels.insert(risk);
        } else {
            self.selection.risk_levels.remove(&risk);
        }
        self.refilter();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match dim {
            Dimension::Year => self.selection.years = ds.years.clone(),
            Dimension::Location => self.selection.locations = ds.locations.clone(),
            Dimension::RiskLevel => self.selection.risk_levels = ds.risk_levels.clone(),
        }
        self.refilter();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        match dim {
            Dimension::Year => self.selection.years.clear(),
            Dimension::Location => self.selection.locations.clear(),
            Dimension::RiskLevel => self.selection.risk_levels.clear(),
        }
        self.refilter();
    }

    pub fn toggle_bar_orientation(&mut self) {
        self.bar_orientation = self.bar_orientation.toggled();
    }
}
