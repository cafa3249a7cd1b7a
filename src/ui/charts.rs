use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, Corner, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::{ColorMap, SeriesKey};
use crate::config::BarOrientation;
use crate::data::aggregate::{
    bar_chart_height, location_bars, TrendPoint, MIN_BAR_CHART_HEIGHT,
};
use crate::data::filter::FilteredView;
use crate::data::model::{Record, COL_BIRTH_RATE, COL_POVERTY};

const SCATTER_HEIGHT: f32 = 450.0;
const TREND_HEIGHT: f32 = 380.0;

const MAX_MARKER_RADIUS: f32 = 10.0;
const MIN_MARKER_RADIUS: f32 = 1.5;

const POVERTY_LINE_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const BIRTH_RATE_LINE_COLOR: Color32 = Color32::from_rgb(239, 85, 59);

/// Marker radius so that marker *area* is proportional to `value`.
pub fn marker_radius(value: f64, max_value: f64) -> f32 {
    if max_value <= 0.0 || value <= 0.0 {
        return MIN_MARKER_RADIUS;
    }
    let r = MAX_MARKER_RADIUS * (value / max_value).sqrt() as f32;
    r.clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS)
}

/// Category name for an axis tick, or nothing between categories.
fn category_label(names: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

fn year_label(value: f64) -> String {
    if (value - value.round()).abs() > 1e-6 {
        String::new()
    } else {
        format!("{}", value.round() as i64)
    }
}

// ---------------------------------------------------------------------------
// 1. Correlation analysis (scatter)
// ---------------------------------------------------------------------------

/// Rows with both coordinates present, paired with them.
fn plotted_points<'a>(view: &FilteredView<'a>) -> Vec<(&'a Record, f64, f64)> {
    view.iter()
        .filter_map(|r| Some((r, r.poverty_incidence?, r.teenage_birth_rate?)))
        .collect()
}

pub fn scatter_chart(ui: &mut Ui, view: &FilteredView<'_>, color_map: &ColorMap) {
    let points = plotted_points(view);
    let max_poverty = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);

    // Hover lookup: the nearest visible point names its location.
    let hover: Vec<(f64, f64, String)> = points
        .iter()
        .map(|(r, x, y)| (*x, *y, r.location.clone()))
        .collect();

    Plot::new("scatter_plot")
        .legend(Legend::default().position(Corner::RightTop))
        .height(SCATTER_HEIGHT)
        .x_axis_label(COL_POVERTY)
        .y_axis_label(COL_BIRTH_RATE)
        .allow_scroll(false)
        .label_formatter(move |name, value| {
            if name.is_empty() {
                return format!("{:.1}, {:.1}", value.x, value.y);
            }
            hover
                .iter()
                .min_by(|a, b| {
                    let da = (a.0 - value.x).powi(2) + (a.1 - value.y).powi(2);
                    let db = (b.0 - value.x).powi(2) + (b.1 - value.y).powi(2);
                    da.total_cmp(&db)
                })
                .map(|(x, y, location)| {
                    format!("{location}\n{COL_POVERTY}: {x:.1}\n{COL_BIRTH_RATE}: {y:.1}")
                })
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (rec, x, y) in points {
                let key = color_map.key_for(rec);
                let point = Points::new(PlotPoints::new(vec![[x, y]]))
                    .radius(marker_radius(x, max_poverty))
                    .color(color_map.color_for(rec))
                    .filled(true)
                    .name(key.label());
                plot_ui.points(point);
            }
        });
}

// ---------------------------------------------------------------------------
// 2. Provincial comparison (stacked bars)
// ---------------------------------------------------------------------------

pub fn bar_chart(
    ui: &mut Ui,
    view: &FilteredView<'_>,
    color_map: &ColorMap,
    orientation: BarOrientation,
) {
    let bars = location_bars(view.iter());
    let horizontal = orientation == BarOrientation::Horizontal;
    let height = if horizontal {
        bar_chart_height(view.distinct_locations())
    } else {
        MIN_BAR_CHART_HEIGHT
    };

    // One BarChart per colour so the legend lists each series once.
    let mut series: BTreeMap<SeriesKey, Vec<Bar>> = BTreeMap::new();
    for (pos, bar) in bars.iter().enumerate() {
        let mut offset = 0.0;
        for seg in &bar.segments {
            let rec = seg.record;
            series.entry(color_map.key_for(rec)).or_default().push(
                Bar::new(pos as f64, seg.value)
                    .base_offset(offset)
                    .width(0.7)
                    .name(format!("{} ({})", rec.location, rec.year)),
            );
            offset += seg.value;
        }
    }

    let names: Vec<String> = bars.iter().map(|b| b.location.to_string()).collect();
    let categories = move |mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>| {
        category_label(&names, mark.value)
    };

    let mut plot = Plot::new("bar_plot")
        .legend(Legend::default().position(Corner::RightBottom))
        .height(height)
        .allow_scroll(false);

    plot = if horizontal {
        plot.x_axis_label(COL_BIRTH_RATE)
            .y_axis_formatter(categories)
            .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
    } else {
        plot.y_axis_label(COL_BIRTH_RATE)
            .x_axis_formatter(categories)
            .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
    };

    plot.show(ui, |plot_ui| {
        for (key, items) in series {
            let mut chart = BarChart::new(items)
                .name(key.label())
                .color(color_map.color_for_key(key));
            if horizontal {
                chart = chart.horizontal();
            }
            plot_ui.bar_chart(chart);
        }
    });
}

// ---------------------------------------------------------------------------
// 3. Yearly trends (lines)
// ---------------------------------------------------------------------------

/// Points of one trend line; years without a value for the column are left out.
fn trend_series(
    trend: &[TrendPoint],
    value: impl Fn(&TrendPoint) -> Option<f64>,
) -> Vec<[f64; 2]> {
    trend
        .iter()
        .filter_map(|p| value(p).map(|v| [p.year as f64, v]))
        .collect()
}

pub fn trend_chart(ui: &mut Ui, trend: &[TrendPoint]) {
    let series: [(&str, Color32, Vec<[f64; 2]>); 2] = [
        (
            COL_POVERTY,
            POVERTY_LINE_COLOR,
            trend_series(trend, |p| p.avg_poverty),
        ),
        (
            COL_BIRTH_RATE,
            BIRTH_RATE_LINE_COLOR,
            trend_series(trend, |p| p.avg_birth_rate),
        ),
    ];

    Plot::new("trend_plot")
        .legend(Legend::default().position(Corner::RightTop))
        .height(TREND_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Average (%)")
        .allow_scroll(false)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(|mark, _range| year_label(mark.value))
        .show(ui, |plot_ui| {
            for (name, color, points) in series {
                plot_ui.line(
                    Line::new(PlotPoints::new(points.clone()))
                        .name(name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(name)
                        .color(color)
                        .radius(4.0)
                        .filled(true),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Dataset;

    #[test]
    fn marker_area_scales_with_value() {
        assert_eq!(marker_radius(50.0, 50.0), MAX_MARKER_RADIUS);
        let quarter = marker_radius(12.5, 50.0);
        assert!((quarter - MAX_MARKER_RADIUS / 2.0).abs() < 1e-4);
        assert_eq!(marker_radius(0.0, 50.0), MIN_MARKER_RADIUS);
        assert_eq!(marker_radius(10.0, 0.0), MIN_MARKER_RADIUS);
    }

    #[test]
    fn category_ticks_only_on_whole_positions() {
        let names = vec!["Abra".to_string(), "Cebu".to_string()];
        assert_eq!(category_label(&names, 0.0), "Abra");
        assert_eq!(category_label(&names, 1.0), "Cebu");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }

    #[test]
    fn trend_lines_leave_out_missing_years() {
        let trend = vec![
            TrendPoint {
                year: 2018,
                avg_poverty: Some(20.0),
                avg_birth_rate: None,
            },
            TrendPoint {
                year: 2021,
                avg_poverty: Some(30.0),
                avg_birth_rate: Some(6.0),
            },
        ];
        assert_eq!(
            trend_series(&trend, |p| p.avg_poverty),
            vec![[2018.0, 20.0], [2021.0, 30.0]]
        );
        assert_eq!(trend_series(&trend, |p| p.avg_birth_rate), vec![[2021.0, 6.0]]);
    }

    #[test]
    fn scatter_drops_rows_missing_a_coordinate() {
        let records = vec![
            Record {
                year: 2018,
                location: "Abra".to_string(),
                poverty_incidence: None,
                teenage_birth_rate: Some(5.0),
                risk_level: None,
            },
            Record {
                year: 2018,
                location: "Cebu".to_string(),
                poverty_incidence: Some(12.0),
                teenage_birth_rate: Some(3.0),
                risk_level: None,
            },
        ];
        let ds = Dataset::from_records(records, false);
        let view = FilteredView::from_indices(&ds, vec![0, 1]);
        let points = plotted_points(&view);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].0.location, "Cebu");
        assert_eq!((points[0].1, points[0].2), (12.0, 3.0));
    }

    #[test]
    fn year_ticks_are_integers() {
        assert_eq!(year_label(2021.0), "2021");
        assert_eq!(year_label(2021.5), "");
    }
}
