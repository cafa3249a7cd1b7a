pub mod charts;
pub mod panels;
pub mod table;

use eframe::egui::{RichText, Ui};

use crate::state::AppState;

/// Scrollable main page: header, metrics, the three charts, and the table.
pub fn dashboard_page(ui: &mut Ui, state: &AppState) {
    let (Some(view), Some(color_map)) = (state.view(), state.color_map.as_ref()) else {
        return;
    };
    let show_risk = state.dataset.as_ref().is_some_and(|ds| ds.has_risk_level());

    panels::page_header(ui);
    panels::metrics_row(ui, &state.summary);
    ui.separator();

    if view.is_empty() {
        ui.label(RichText::new("No records match the current filters.").weak());
    }

    ui.heading("1. Correlation Analysis");
    ui.label(
        RichText::new(format!(
            "Poverty vs. Pregnancy, coloured by {} (hover a point for its location)",
            color_map.column_label()
        ))
        .weak(),
    );
    charts::scatter_chart(ui, &view, color_map);

    ui.add_space(12.0);
    ui.heading("2. Provincial Comparison");
    ui.label(RichText::new("Teenage Birth Rates by Province/City").weak());
    charts::bar_chart(ui, &view, color_map, state.bar_orientation);

    ui.add_space(12.0);
    ui.heading("3. Yearly Trends");
    ui.label(RichText::new("Average Trends").weak());
    charts::trend_chart(ui, &state.trend);

    ui.separator();
    ui.heading("4. Raw Data Table");
    table::data_table(ui, &view, show_risk);

    panels::attribution(ui);
}
