use std::path::Path;

use eframe::egui;

use crate::data::loader::DEFAULT_DATA_FILE;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EsajApp {
    pub state: AppState,
}

impl EsajApp {
    /// Start with `path` loaded when it exists.
    pub fn with_startup_file(path: &Path) -> Self {
        let mut state = AppState::default();
        if path.exists() {
            state.load_path(path);
        } else {
            log::warn!("Startup file {} not found", path.display());
            state.status_message = Some(format!(
                "Erro: o arquivo '{}' não foi encontrado. Use Arquivo → Abrir…",
                path.display()
            ));
        }
        Self { state }
    }
}

impl Default for EsajApp {
    fn default() -> Self {
        Self::with_startup_file(Path::new(DEFAULT_DATA_FILE))
    }
}

impl eframe::App for EsajApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::report(ui, &self.state);
        });
    }
}
