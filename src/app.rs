use eframe::egui::{self, ScrollArea};

use crate::config::DashboardConfig;
use crate::data::loader::DatasetCache;
use crate::state::AppState;
use crate::ui::{dashboard_page, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    /// Owns the process-wide dataset memo for the lifetime of the window.
    pub cache: DatasetCache,
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: &DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.data_path.clone());
        let state = AppState::from_cache(&cache, config);
        Self { cache, state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: source and record counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, self.cache.path());
        });

        // ---- Load failure: message only, no metrics or charts ----
        if let Some(message) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::load_error(ui, message);
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    dashboard_page(ui, &self.state);
                });
        });
    }
}
