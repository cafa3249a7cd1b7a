use std::collections::BTreeSet;
use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::{risk_color, ColorMap, SeriesKey};
use crate::config::BarOrientation;
use crate::data::aggregate::Summary;
use crate::state::{AppState, Dimension};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the user did inside one filter section this frame.
enum SectionAction<T> {
    All,
    None,
    Set(T, bool),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    // Hold our own handle so the state can be mutated inside the loops.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let color_map = state.color_map.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if dataset.has_risk_level() {
                let action = filter_section(
                    ui,
                    "Select Risk Level:",
                    &dataset.risk_levels,
                    &state.selection.risk_levels,
                    true,
                    |r| RichText::new(r.as_str()).color(risk_color(*r)),
                );
                match action {
                    Some(SectionAction::All) => state.select_all(Dimension::RiskLevel),
                    Some(SectionAction::None) => state.select_none(Dimension::RiskLevel),
                    Some(SectionAction::Set(r, on)) => state.set_risk_level(r, on),
                    None => {}
                }
            }

            let action = filter_section(
                ui,
                "Select Year:",
                &dataset.years,
                &state.selection.years,
                true,
                |y| year_label(*y, color_map.as_ref()),
            );
            match action {
                Some(SectionAction::All) => state.select_all(Dimension::Year),
                Some(SectionAction::None) => state.select_none(Dimension::Year),
                Some(SectionAction::Set(y, on)) => state.set_year(y, on),
                None => {}
            }

            let action = filter_section(
                ui,
                "Select Province/City:",
                &dataset.locations,
                &state.selection.locations,
                false,
                |l| RichText::new(l.as_str()),
            );
            if state.selection.locations.is_empty() {
                ui.label(RichText::new("No province selected: showing all.").weak());
            }
            match action {
                Some(SectionAction::All) => state.select_all(Dimension::Location),
                Some(SectionAction::None) => state.select_none(Dimension::Location),
                Some(SectionAction::Set(l, on)) => state.set_location(&l, on),
                None => {}
            }
        });
}

fn year_label(year: i32, color_map: Option<&ColorMap>) -> RichText {
    let text = RichText::new(year.to_string());
    match color_map {
        Some(cm) if !cm.colors_by_risk() => text.color(cm.color_for_key(SeriesKey::Year(year))),
        _ => text,
    }
}

/// One collapsible multi-select with All/None buttons and a
/// `selected/total` counter in its header.
fn filter_section<T: Clone + Ord>(
    ui: &mut Ui,
    title: &str,
    all_values: &BTreeSet<T>,
    selected: &BTreeSet<T>,
    default_open: bool,
    label: impl Fn(&T) -> RichText,
) -> Option<SectionAction<T>> {
    let mut action = None;
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(default_open)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = Some(SectionAction::All);
                }
                if ui.small_button("None").clicked() {
                    action = Some(SectionAction::None);
                }
            });

            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, label(val)).changed() {
                    action = Some(SectionAction::Set(val.clone(), checked));
                }
            }
        });

    action
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, source: &Path) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new(source.display().to_string()).monospace());

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));

            ui.separator();

            if ui
                .selectable_label(
                    state.bar_orientation == BarOrientation::Horizontal,
                    "Horizontal bars",
                )
                .clicked()
            {
                state.toggle_bar_orientation();
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Page sections
// ---------------------------------------------------------------------------

/// Full-page message shown instead of the dashboard when loading failed.
pub fn load_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(message).color(Color32::RED).heading());
    });
}

pub fn page_header(ui: &mut Ui) {
    ui.heading(RichText::new("Teenage Pregnancy & Poverty Correlation").size(26.0));
    ui.label(
        RichText::new("Correlating Regional Poverty Index with Teenage Birth Rates").strong(),
    );
    ui.add_space(8.0);
}

/// Format a percentage metric the way it is displayed.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// The three headline metrics, side by side.
pub fn metrics_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Avg. Poverty", &format_percent(summary.avg_poverty));
        metric(&mut cols[1], "Avg. Birth Rate", &format_percent(summary.avg_birth_rate));
        metric(&mut cols[2], "Records", &summary.count.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(30.0));
}

pub fn attribution(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.label(RichText::new("Data Source: PSA OpenSTAT | Note: Prototype Demo").small().weak());
    ui.label(
        RichText::new("Poverty statistics are published for the 2018, 2021 and 2023 survey rounds.")
            .small()
            .weak(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_use_one_decimal() {
        assert_eq!(format_percent(30.0), "30.0%");
        assert_eq!(format_percent(7.46), "7.5%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
