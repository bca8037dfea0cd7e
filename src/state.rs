use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::classify::{ROLE_KEYWORD, classify, classify_with_keyword};
use crate::data::error::PipelineError;
use crate::data::loader::{LoaderOptions, load_file};
use crate::data::model::{FilterSelection, IndexedTable, RoleColumnSet};
use crate::data::pipeline::{PipelineOutput, run};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The state of one viewing session, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// How source files are interpreted.
    pub options: LoaderOptions,

    /// Loaded table (None until a file loads). Never mutated once loaded.
    pub table: Option<Arc<IndexedTable>>,

    /// Where the table came from.
    pub source: Option<PathBuf>,

    /// Role columns of the loaded table.
    pub roles: RoleColumnSet,

    /// Years of the loaded table, ascending.
    pub years: Vec<i32>,

    /// Current filter selection.
    pub selection: Option<FilterSelection>,

    /// Views for the current selection.
    pub output: Option<PipelineOutput>,

    /// Why `output` is missing for the current selection.
    pub validation_message: Option<String>,

    /// Colour per role series.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` and make it the current table. Errors end up in
    /// `status_message`; the previous table stays in place.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path, &self.options) {
            Ok(table) => {
                log::info!(
                    "Loaded {} year(s) from {} with columns {:?}",
                    table.len(),
                    path.display(),
                    table.columns()
                );
                self.set_table(table);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Erro: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table: all years and all roles selected.
    pub fn set_table(&mut self, table: IndexedTable) {
        self.roles = if self.options.role_keyword == ROLE_KEYWORD {
            classify(table.columns())
        } else {
            classify_with_keyword(table.columns(), &self.options.role_keyword)
        };
        log::info!("Role columns: {:?}", self.roles.as_slice());
        self.years = table.years();
        self.selection = FilterSelection::everything(&table, &self.roles);
        self.color_map = Some(ColorMap::new(&self.roles));
        self.table = Some(Arc::new(table));
        self.status_message = None;
        self.refresh();
    }

    /// Re-run the pipeline for the current selection.
    pub fn refresh(&mut self) {
        self.output = None;
        self.validation_message = None;

        let (Some(table), Some(selection)) = (&self.table, &self.selection) else {
            return;
        };
        match run(table, selection) {
            Ok(output) => self.output = Some(output),
            Err(e) => {
                if !e.is_recoverable() {
                    log::error!("Pipeline failed: {e}");
                }
                self.validation_message = Some(user_message(&e, selection));
            }
        }
    }

    pub fn set_year_start(&mut self, year: i32) {
        if let Some(sel) = &mut self.selection {
            sel.year_start = year;
        }
        self.refresh();
    }

    pub fn set_year_end(&mut self, year: i32) {
        if let Some(sel) = &mut self.selection {
            sel.year_end = year;
        }
        self.refresh();
    }

    pub fn is_role_selected(&self, role: &str) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|sel| sel.roles.iter().any(|r| r == role))
    }

    /// Toggle one role; the selection keeps header order.
    pub fn toggle_role(&mut self, role: &str) {
        let selected = !self.is_role_selected(role);
        let roles: Vec<String> = self
            .roles
            .iter()
            .filter(|r| {
                if r.as_str() == role {
                    selected
                } else {
                    self.is_role_selected(r)
                }
            })
            .cloned()
            .collect();
        if let Some(sel) = &mut self.selection {
            sel.roles = roles;
        }
        self.refresh();
    }

    pub fn select_all_roles(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.roles = self.roles.as_slice().to_vec();
        }
        self.refresh();
    }

    pub fn select_no_roles(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.roles.clear();
        }
        self.refresh();
    }
}

/// Message shown in place of the charts.
fn user_message(err: &PipelineError, selection: &FilterSelection) -> String {
    match err {
        PipelineError::InvalidRange { .. } => {
            "O ano inicial não pode ser maior que o ano final. Por favor, ajuste.".to_string()
        }
        PipelineError::InvalidColumns { .. } if selection.roles.is_empty() => {
            "Nenhum cargo selecionado. Por favor, selecione ao menos um.".to_string()
        }
        PipelineError::InvalidColumns { .. } => {
            "Os cargos selecionados não foram encontrados nas colunas do arquivo.".to_string()
        }
        other => format!("Erro: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load, read_csv};

    fn state() -> AppState {
        let raw = read_csv(
            "Ano,PROMOTOR_A,Outros,Promotor B\n2020,1,9,4\n2021,2,9,5\n2022,3,9,6\n".as_bytes(),
        )
        .unwrap();
        let mut state = AppState::default();
        state.set_table(load(raw, &state.options).unwrap());
        state
    }

    #[test]
    fn new_table_selects_everything() {
        let s = state();
        assert_eq!(s.roles.as_slice(), &["PROMOTOR_A", "Promotor B"]);
        assert_eq!(s.years, vec![2020, 2021, 2022]);
        let out = s.output.as_ref().unwrap();
        assert_eq!(out.raw.len(), 3);
        assert_eq!(out.totals[0].role, "Promotor B");
        assert!(s.validation_message.is_none());
    }

    #[test]
    fn inverted_years_show_message_and_no_output() {
        let mut s = state();
        s.set_year_start(2022);
        s.set_year_end(2020);
        assert!(s.output.is_none());
        assert!(s.validation_message.as_deref().unwrap().contains("ano inicial"));

        s.set_year_end(2022);
        assert_eq!(s.output.as_ref().unwrap().raw.years(), vec![2022]);
    }

    #[test]
    fn toggling_roles_keeps_header_order() {
        let mut s = state();
        s.toggle_role("PROMOTOR_A");
        assert_eq!(s.selection.as_ref().unwrap().roles, vec!["Promotor B"]);
        s.toggle_role("PROMOTOR_A");
        assert_eq!(
            s.selection.as_ref().unwrap().roles,
            vec!["PROMOTOR_A", "Promotor B"]
        );
    }

    #[test]
    fn no_roles_selected_is_reported() {
        let mut s = state();
        s.select_no_roles();
        assert!(s.output.is_none());
        assert!(s.validation_message.as_deref().unwrap().contains("Nenhum cargo"));

        s.select_all_roles();
        assert!(s.output.is_some());
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut s = state();
        s.load_path(Path::new("/nonexistent/cargos_ano.csv"));
        assert!(s.status_message.is_some());
        assert!(s.table.is_some());
    }

    #[test]
    fn custom_role_keyword_picks_other_columns() {
        let raw = read_csv("Ano,PROMOTOR_A,Juiz 1,juiz 2\n2020,1,2,3\n".as_bytes()).unwrap();
        let mut state = AppState::default();
        state.options.role_keyword = "JUIZ".to_string();
        state.set_table(load(raw, &state.options).unwrap());
        assert_eq!(state.roles.as_slice(), &["Juiz 1", "juiz 2"]);
        assert_eq!(state.output.as_ref().unwrap().totals[0].role, "juiz 2");
    }
}
