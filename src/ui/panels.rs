use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::{APP_TITLE, EXPORT_FILE_NAME, EXPORT_MIME, UPLOAD_EXTENSIONS};
use crate::data::sample::SampleDataset;
use crate::state::{AppState, SourceKind};

// ---------------------------------------------------------------------------
// Left side panel – data source selection
// ---------------------------------------------------------------------------

/// Render the left data-source panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Data");
    ui.separator();

    ui.label("Choose data source:");
    let mut source = state.selection.source;
    ui.radio_value(&mut source, SourceKind::Upload, "Upload CSV/XLSX");
    ui.radio_value(&mut source, SourceKind::Sample, "Use Sample Dataset");
    state.set_source(source);

    ui.add_space(8.0);

    match state.selection.source {
        SourceKind::Upload => {
            ui.label("Upload CSV or Excel");
            if ui.button("Browse files…").clicked() {
                open_file_dialog(state);
            }
            if let Some((file_name, bytes)) = &state.selection.upload {
                ui.label(
                    RichText::new(format!("{file_name} ({} bytes)", bytes.len()))
                        .weak()
                        .small(),
                );
            }
        }
        SourceKind::Sample => {
            let mut sample = state.selection.sample;
            egui::ComboBox::from_label("Sample Dataset")
                .selected_text(sample.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in SampleDataset::ALL {
                        ui.selectable_value(&mut sample, option, option.name());
                    }
                });
            state.set_sample(sample);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar and footer
// ---------------------------------------------------------------------------

/// Render the title bar and the status line.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(APP_TITLE).strong());
    });

    ui.horizontal(|ui: &mut Ui| {
        if let Some(ds) = state.dataset() {
            let (rows, cols) = ds.shape();
            ui.label(format!("{rows} rows × {cols} columns loaded"));
        }
        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Made with egui").weak());
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Pick a file and hand its bytes to the explorer. Files with other
/// extensions can still be picked and are rejected by the loader.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload CSV or Excel")
        .add_filter("Supported files", &UPLOAD_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("All files", &["*"])
        .pick_file();

    let Some(path) = file else {
        return;
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match std::fs::read(&path) {
        Ok(bytes) => state.upload(file_name, bytes),
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            state.status_message = Some(format!("Error: could not read {file_name}: {e}"));
        }
    }
}

/// Export the current dataset through a save dialog.
pub fn save_export_dialog(state: &mut AppState) {
    let bytes = match state.export_bytes() {
        Some(Ok(bytes)) => bytes,
        Some(Err(e)) => {
            log::error!("Failed to serialize dataset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            return;
        }
        None => return,
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Download as CSV")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match std::fs::write(&path, &bytes) {
        Ok(()) => {
            log::info!("Exported {} bytes ({EXPORT_MIME}) to {}", bytes.len(), path.display());
        }
        Err(e) => {
            log::error!("Failed to write {}: {e}", path.display());
            state.status_message = Some(format!("Error: could not write {}: {e}", path.display()));
        }
    }
}
