use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::{
    Record, COL_BIRTH_RATE, COL_LOCATION, COL_POVERTY, COL_RISK_LEVEL, COL_YEAR,
};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;
const TABLE_MAX_HEIGHT: f32 = 420.0;

/// Column headers for the raw-data table.
pub fn table_headers(show_risk: bool) -> Vec<&'static str> {
    let mut headers = vec![COL_YEAR, COL_LOCATION, COL_POVERTY, COL_BIRTH_RATE];
    if show_risk {
        headers.push(COL_RISK_LEVEL);
    }
    headers
}

/// Stored value at full precision; a missing cell stays blank.
fn percentage_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Cell texts of one record, matching [`table_headers`].
pub fn row_cells(rec: &Record, show_risk: bool) -> Vec<String> {
    let mut cells = vec![
        rec.year.to_string(),
        rec.location.clone(),
        percentage_cell(rec.poverty_incidence),
        percentage_cell(rec.teenage_birth_rate),
    ];
    if show_risk {
        cells.push(rec.risk_level.map(|r| r.to_string()).unwrap_or_default());
    }
    cells
}

/// Every visible row, in file order.
pub fn data_table(ui: &mut Ui, view: &FilteredView<'_>, show_risk: bool) {
    let headers = table_headers(show_risk);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(90.0), headers.len() - 1)
        .column(Column::remainder())
        .max_scroll_height(TABLE_MAX_HEIGHT)
        .header(HEADER_HEIGHT, |mut header| {
            for name in &headers {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let rec = view.rows()[row.index()];
                for text in row_cells(rec, show_risk) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RiskLevel;

    fn rec(risk: Option<RiskLevel>) -> Record {
        Record {
            year: 2021,
            location: "Cebu".to_string(),
            poverty_incidence: Some(40.0),
            teenage_birth_rate: Some(10.126),
            risk_level: risk,
        }
    }

    #[test]
    fn risk_column_only_when_present() {
        assert_eq!(table_headers(false).len(), 4);
        assert_eq!(table_headers(true).last(), Some(&COL_RISK_LEVEL));
    }

    #[test]
    fn cells_follow_header_order() {
        let cells = row_cells(&rec(Some(RiskLevel::High)), true);
        assert_eq!(cells, vec!["2021", "Cebu", "40", "10.126", "High"]);

        let cells = row_cells(&rec(None), false);
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn values_keep_full_precision() {
        let mut r = rec(None);
        r.poverty_incidence = Some(12.3456);
        r.teenage_birth_rate = Some(0.1);
        let cells = row_cells(&r, false);
        assert_eq!(cells[2], "12.3456");
        assert_eq!(cells[3], "0.1");
    }

    #[test]
    fn missing_value_is_blank_cell() {
        let mut r = rec(Some(RiskLevel::Low));
        r.poverty_incidence = None;
        assert_eq!(row_cells(&r, true), vec!["2021", "Cebu", "", "10.126", "Low"]);
    }
}
