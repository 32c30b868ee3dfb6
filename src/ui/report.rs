use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use super::panels::save_export_dialog;
use super::plot;
use crate::config::{EXPORT_FILE_NAME, PREVIEW_ROWS};
use crate::data::distribution::Distribution;
use crate::data::model::Dataset;
use crate::data::summary::Summary;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Central panel – the exploration report
// ---------------------------------------------------------------------------

/// Render every report section for the loaded dataset, or a prompt when
/// nothing is loaded.
pub fn report(ui: &mut Ui, state: &mut AppState) {
    let Some(loaded) = state.loaded() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("📂 Please upload a file or select a sample dataset.");
        });
        return;
    };

    let numeric_columns = state.numeric_column_names();
    let mut chosen_column = state.selection.column.clone();
    let mut export_requested = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            section(ui, "🔍 Data Preview");
            preview_table(ui, &loaded.dataset);

            section(ui, "📋 Basic Info");
            basic_info(ui, &loaded.summary);

            section(ui, "🏷 Column Types");
            column_types(ui, &loaded.summary);

            section(ui, "📈 Summary Statistics");
            describe_table(ui, &loaded.summary);

            section(ui, "🕳 Missing Values per Column");
            missing_values(ui, &loaded.summary);

            section(ui, "🔗 Correlation Matrix");
            match &loaded.correlation {
                Some(matrix) => plot::correlation_heatmap(ui, matrix),
                None => info(ui, "No numeric columns available."),
            }

            section(ui, "📉 Distribution Plot");
            distribution_section(
                ui,
                &numeric_columns,
                &mut chosen_column,
                loaded.distribution.as_ref(),
            );

            section(ui, "📥 Download Data");
            if ui
                .button("Download as CSV")
                .on_hover_text(format!("Saves {EXPORT_FILE_NAME}"))
                .clicked()
            {
                export_requested = true;
            }
            ui.add_space(16.0);
        });

    if let Some(column) = chosen_column {
        state.select_column(&column);
    }
    if export_requested {
        save_export_dialog(state);
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.separator();
}

fn info(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(format!("ℹ {text}")).italics());
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, dataset: &Dataset) {
    let names = dataset.column_names();
    let rows = dataset.head(PREVIEW_ROWS);

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("preview_table")
                .striped(true)
                .vscroll(false)
                .columns(TableColumn::auto().at_least(40.0), names.len() + 1)
                .header(ROW_HEIGHT, |mut header| {
                    header.col(|ui| {
                        ui.strong("");
                    });
                    for name in &names {
                        header.col(|ui| {
                            ui.strong(*name);
                        });
                    }
                })
                .body(|mut body| {
                    for (index, row) in rows.iter().enumerate() {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui| {
                                ui.label(RichText::new(index.to_string()).weak());
                            });
                            for cell in row {
                                table_row.col(|ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    }
                });
        });
}

fn basic_info(ui: &mut Ui, summary: &Summary) {
    let (rows, cols) = summary.shape;
    ui.columns(3, |columns| {
        metric(&mut columns[0], "Rows", rows);
        metric(&mut columns[1], "Columns", cols);
        metric(&mut columns[2], "Missing Values", summary.total_missing);
    });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value.to_string()).size(28.0).strong());
}

fn column_types(ui: &mut Ui, summary: &Summary) {
    egui::Grid::new("column_types")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for (name, dtype) in &summary.dtypes {
                ui.label(name);
                ui.monospace(dtype.label());
                ui.end_row();
            }
        });
}

fn describe_table(ui: &mut Ui, summary: &Summary) {
    let rows = summary.describe_rows();

    ScrollArea::horizontal()
        .id_salt("describe_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("describe_table")
                .striped(true)
                .vscroll(false)
                .column(TableColumn::auto().at_least(50.0))
                .columns(TableColumn::auto().at_least(80.0), summary.describe.len())
                .header(ROW_HEIGHT, |mut header| {
                    header.col(|ui| {
                        ui.strong("");
                    });
                    for col in &summary.describe {
                        header.col(|ui| {
                            ui.strong(&col.name);
                        });
                    }
                })
                .body(|mut body| {
                    for stat in &rows {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui| {
                                ui.strong(*stat);
                            });
                            for col in &summary.describe {
                                table_row.col(|ui| {
                                    ui.monospace(col.describe_cell(stat));
                                });
                            }
                        });
                    }
                });
        });
}

fn missing_values(ui: &mut Ui, summary: &Summary) {
    if summary.missing.is_empty() {
        info(ui, "No missing values.");
        return;
    }
    egui::Grid::new("missing_values")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for (name, count) in &summary.missing {
                ui.label(name);
                ui.monospace(count.to_string());
                ui.end_row();
            }
        });
}

/// Column selector plus plot. The selector is only offered when there is at
/// least one numeric column.
fn distribution_section(
    ui: &mut Ui,
    numeric_columns: &[String],
    chosen: &mut Option<String>,
    dist: Option<&Distribution>,
) {
    if numeric_columns.is_empty() {
        info(ui, "No numeric column for distribution.");
        return;
    }

    let selected_text = chosen.clone().unwrap_or_default();
    egui::ComboBox::from_label("Select column for distribution:")
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            for name in numeric_columns {
                ui.selectable_value(chosen, Some(name.clone()), name);
            }
        });

    if let Some(dist) = dist {
        plot::distribution_plot(ui, dist);
    }
}
