use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::write_views;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    if state.table.is_none() {
        ui.label("Nenhum arquivo carregado.");
        return;
    }
    if state.years.is_empty() {
        ui.colored_label(Color32::YELLOW, "Nenhum ano disponível nos dados para filtragem.");
        return;
    }
    let Some(selection) = state.selection.clone() else {
        return;
    };
    let years = state.years.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range ----
            ui.strong("Selecione o ano inicial:");
            let mut start = selection.year_start;
            egui::ComboBox::from_id_salt("year_start")
                .selected_text(start.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in &years {
                        ui.selectable_value(&mut start, *year, year.to_string());
                    }
                });
            if start != selection.year_start {
                state.set_year_start(start);
            }

            ui.strong("Selecione o ano final:");
            let mut end = selection.year_end;
            egui::ComboBox::from_id_salt("year_end")
                .selected_text(end.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in &years {
                        ui.selectable_value(&mut end, *year, year.to_string());
                    }
                });
            if end != selection.year_end {
                state.set_year_end(end);
            }
            ui.separator();

            // ---- Roles ----
            if state.roles.is_empty() {
                ui.colored_label(
                    Color32::YELLOW,
                    format!(
                        "Nenhum cargo com '{}' encontrado nos dados.",
                        state.options.role_keyword
                    ),
                );
                return;
            }

            let roles = state.roles.as_slice().to_vec();
            let n_selected = roles.iter().filter(|r| state.is_role_selected(r)).count();
            ui.strong(format!("Selecione os cargos:  ({n_selected}/{})", roles.len()));

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all_roles();
                }
                if ui.small_button("Nenhum").clicked() {
                    state.select_no_roles();
                }
            });

            for role in &roles {
                let mut checked = state.is_role_selected(role);
                let mut text = RichText::new(role);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(role));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_role(role);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.output.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Exportar visões…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let visible = state.output.as_ref().map_or(0, |o| o.raw.len());
            ui.label(format!(
                "{} anos carregados, {} no período",
                table.len(),
                visible
            ));
        }
        if let Some(source) = &state.source {
            ui.separator();
            ui.label(source.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir tabela de cargos por ano")
        .add_filter("Arquivos suportados", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(output) = &state.output else {
        return;
    };
    let Some(dir) = rfd::FileDialog::new()
        .set_title("Exportar visões para a pasta")
        .pick_folder()
    else {
        return;
    };

    match write_views(&dir, output) {
        Ok(paths) => {
            log::info!("Exported {} file(s) to {}", paths.len(), dir.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Erro ao exportar: {e:#}"));
        }
    }
}
