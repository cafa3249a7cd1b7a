use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_DATA_PATH: &str = "teenage_pregnancy_poverty_merged.csv";

pub const ENV_DATA_PATH: &str = "DASHBOARD_DATA_PATH";
pub const ENV_LOCATION_DEFAULT: &str = "DASHBOARD_LOCATION_DEFAULT";
pub const ENV_BAR_ORIENTATION: &str = "DASHBOARD_BAR_ORIENTATION";

/// Which locations start out selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationDefault {
    #[default]
    All,
    /// The first N locations in sort order.
    First(usize),
}

impl LocationDefault {
    pub fn limit(self) -> Option<usize> {
        match self {
            LocationDefault::All => None,
            LocationDefault::First(n) => Some(n),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Some(LocationDefault::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Some(LocationDefault::First(n)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarOrientation {
    /// Locations down the y axis; chart grows with the number of locations.
    #[default]
    Horizontal,
    Vertical,
}

impl BarOrientation {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Some(BarOrientation::Horizontal),
            "vertical" | "v" => Some(BarOrientation::Vertical),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            BarOrientation::Horizontal => BarOrientation::Vertical,
            BarOrientation::Vertical => BarOrientation::Horizontal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub location_default: LocationDefault,
    pub bar_orientation: BarOrientation,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            location_default: LocationDefault::default(),
            bar_orientation: BarOrientation::default(),
        }
    }
}

impl DashboardConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparseable values are
    /// logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_PATH).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_LOCATION_DEFAULT) {
            match LocationDefault::parse(&raw) {
                Some(v) => config.location_default = v,
                None => log::warn!("Ignoring {ENV_LOCATION_DEFAULT}={raw:?}: expected 'all' or a positive integer"),
            }
        }

        if let Some(raw) = lookup(ENV_BAR_ORIENTATION) {
            match BarOrientation::parse(&raw) {
                Some(v) => config.bar_orientation = v,
                None => log::warn!("Ignoring {ENV_BAR_ORIENTATION}={raw:?}: expected 'horizontal' or 'vertical'"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> DashboardConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_overrides() {
        let config = config_from(&[]);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.location_default.limit(), None);
        assert_eq!(config.bar_orientation, BarOrientation::Horizontal);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            (ENV_DATA_PATH, "data/merged.parquet"),
            (ENV_LOCATION_DEFAULT, "10"),
            (ENV_BAR_ORIENTATION, "Vertical"),
        ]);
        assert_eq!(config.data_path, PathBuf::from("data/merged.parquet"));
        assert_eq!(config.location_default, LocationDefault::First(10));
        assert_eq!(config.bar_orientation, BarOrientation::Vertical);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            (ENV_DATA_PATH, "  "),
            (ENV_LOCATION_DEFAULT, "0"),
            (ENV_BAR_ORIENTATION, "diagonal"),
        ]);
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn orientation_toggles() {
        assert_eq!(BarOrientation::Horizontal.toggled(), BarOrientation::Vertical);
        assert_eq!(BarOrientation::Vertical.toggled(), BarOrientation::Horizontal);
    }
}
