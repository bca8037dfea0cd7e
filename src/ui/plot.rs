use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::{ColorMap, TOTALS_BAR};
use crate::data::model::{FilterSelection, FilteredTable};
use crate::data::pipeline::PipelineOutput;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the report: line chart, ranked bar chart, filtered table.
pub fn report(ui: &mut Ui, state: &AppState) {
    ui.heading("Promotoria de Justiça do Guarujá no e-SAJ");
    ui.separator();

    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Abra um arquivo para ver os dados  (Arquivo → Abrir…)");
        });
        return;
    }

    if let Some(msg) = &state.validation_message {
        ui.label(RichText::new(msg).color(Color32::from_rgb(230, 150, 40)));
        return;
    }

    let (Some(output), Some(selection)) = (&state.output, &state.selection) else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            series_chart(ui, output, selection, state.color_map.as_ref());
            ui.separator();
            totals_chart(ui, output, selection);
            ui.separator();
            raw_table(ui, &output.raw);
        });
}

// ---------------------------------------------------------------------------
// Line chart – one series per role
// ---------------------------------------------------------------------------

fn series_chart(
    ui: &mut Ui,
    output: &PipelineOutput,
    selection: &FilterSelection,
    color_map: Option<&ColorMap>,
) {
    ui.heading("Evolução no Período");
    ui.label(format!(
        "Evolução da Interação dos Cargos Selecionados ({}-{})",
        selection.year_start, selection.year_end
    ));

    Plot::new("series_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Ano")
        .y_axis_label("Número de Registros")
        .x_axis_formatter(year_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for role in output.raw.columns() {
                let points: PlotPoints = output
                    .series
                    .iter()
                    .filter(|row| row.role == *role)
                    .filter_map(|row| row.value.map(|v| [f64::from(row.year), v]))
                    .collect();

                let color = color_map.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(role));
                plot_ui.line(Line::new(points).name(role).color(color).width(2.0));
            }
        });
}

/// Years are whole numbers; skip the fractional grid marks.
fn year_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

// ---------------------------------------------------------------------------
// Bar chart – ranked totals
// ---------------------------------------------------------------------------

fn totals_chart(ui: &mut Ui, output: &PipelineOutput, selection: &FilterSelection) {
    ui.heading("Acumulado por Cargo");
    ui.label(format!(
        "Total de Interação por Cargo no Período ({}-{})",
        selection.year_start, selection.year_end
    ));

    let labels: Vec<String> = output.totals.iter().map(|t| t.role.clone()).collect();
    let bars: Vec<Bar> = output
        .totals
        .iter()
        .enumerate()
        .map(|(i, t)| Bar::new(i as f64, t.total).name(&t.role).fill(TOTALS_BAR))
        .collect();

    Plot::new("totals_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Cargo")
        .y_axis_label("Total de Registros")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value;
            if idx.fract() == 0.0 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(TOTALS_BAR).name("Total"));
        });
}

// ---------------------------------------------------------------------------
// Filtered table
// ---------------------------------------------------------------------------

fn raw_table(ui: &mut Ui, table: &FilteredTable) {
    ui.heading("Dados Filtrados");

    ScrollArea::horizontal()
        .id_salt("raw_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(60.0))
                .columns(Column::auto().at_least(80.0), table.columns().len())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong(table.year_column());
                    });
                    for column in table.columns() {
                        header.col(|ui| {
                            ui.strong(column);
                        });
                    }
                })
                .body(|mut body| {
                    for (year, cells) in table.rows() {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(year.to_string());
                            });
                            for cell in cells {
                                row.col(|ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    }
                });
        });

    if table.is_empty() {
        ui.label(RichText::new("Nenhum ano do arquivo está no período selecionado.").italics());
    }
}
