use crate::config::HISTOGRAM_BINS;
use crate::data::correlation::{CorrelationMatrix, correlation_matrix};
use crate::data::distribution::{Distribution, distribution};
use crate::data::export::to_csv_bytes;
use crate::data::loader::{DataSource, acquire};
use crate::data::model::Dataset;
use crate::data::sample::SampleDataset;
use crate::data::summary::{Summary, summarize};

// ---------------------------------------------------------------------------
// Explorer state machine
// ---------------------------------------------------------------------------

/// `Empty → Loaded → Loaded | Empty`. Analyses only exist in `Loaded`.
pub enum ExplorerState {
    Empty,
    Loaded(Box<LoadedDataset>),
}

/// A dataset together with the analyses derived from it.
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub summary: Summary,
    /// `None` when there is no numeric column.
    pub correlation: Option<CorrelationMatrix>,
    /// `None` when there is no numeric column.
    pub distribution: Option<Distribution>,
}

// ---------------------------------------------------------------------------
// User selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Upload,
    Sample,
}

/// What the user picked in the side panel.
#[derive(Debug, Clone)]
pub struct UserSelection {
    pub source: SourceKind,
    pub sample: SampleDataset,
    /// Uploaded file name and contents; dropped when the source changes.
    pub upload: Option<(String, Vec<u8>)>,
    /// Column shown in the distribution plot.
    pub column: Option<String>,
}

impl Default for UserSelection {
    fn default() -> Self {
        Self {
            source: SourceKind::Sample,
            sample: SampleDataset::Iris,
            upload: None,
            column: None,
        }
    }
}

impl UserSelection {
    pub fn data_source(&self) -> Option<DataSource> {
        match self.source {
            SourceKind::Upload => self.upload.as_ref().map(|(file_name, bytes)| DataSource::Upload {
                file_name: file_name.clone(),
                bytes: bytes.clone(),
            }),
            SourceKind::Sample => Some(DataSource::Sample(self.sample.name().to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub explorer: ExplorerState,
    pub selection: UserSelection,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    /// Starts on the Iris sample, already loaded.
    fn default() -> Self {
        let mut state = Self {
            explorer: ExplorerState::Empty,
            selection: UserSelection::default(),
            status_message: None,
        };
        state.reload();
        state
    }
}

impl AppState {
    pub fn loaded(&self) -> Option<&LoadedDataset> {
        match &self.explorer {
            ExplorerState::Loaded(loaded) => Some(loaded.as_ref()),
            ExplorerState::Empty => None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.loaded().map(|l| &l.dataset)
    }

    /// Re-run acquisition for the current selection.
    pub fn reload(&mut self) {
        let source = self.selection.data_source();
        self.apply_source(source.as_ref());
    }

    /// Acquire from `source` and replace the current dataset. Any failure
    /// leaves the explorer empty.
    pub fn apply_source(&mut self, source: Option<&DataSource>) {
        match acquire(source) {
            Ok(Some(dataset)) => {
                let (rows, cols) = dataset.shape();
                log::info!("Loaded {} with {rows} rows and {cols} columns", describe_source(source));
                self.set_dataset(dataset);
                self.status_message = None;
            }
            Ok(None) => {
                self.explorer = ExplorerState::Empty;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}", describe_source(source));
                self.explorer = ExplorerState::Empty;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_source(&mut self, source: SourceKind) {
        if self.selection.source == source {
            return;
        }
        self.selection.source = source;
        self.selection.upload = None;
        self.reload();
    }

    pub fn set_sample(&mut self, sample: SampleDataset) {
        if self.selection.source == SourceKind::Sample && self.selection.sample == sample {
            return;
        }
        self.selection.source = SourceKind::Sample;
        self.selection.sample = sample;
        self.reload();
    }

    pub fn upload(&mut self, file_name: String, bytes: Vec<u8>) {
        self.selection.source = SourceKind::Upload;
        self.selection.upload = Some((file_name, bytes));
        self.reload();
    }

    /// Ingest a newly loaded dataset and compute its analyses.
    fn set_dataset(&mut self, dataset: Dataset) {
        let summary = summarize(&dataset);
        let correlation = correlation_matrix(&dataset);
        if correlation.is_none() {
            log::debug!("No numeric columns; correlation and distribution unavailable");
        }

        // Keep the chosen column when it is still numeric, otherwise fall
        // back to the first numeric column.
        let keep = self
            .selection
            .column
            .as_deref()
            .and_then(|name| dataset.column(name))
            .is_some_and(|c| c.dtype.is_numeric());
        if !keep {
            self.selection.column = dataset
                .numeric_columns()
                .first()
                .map(|c| c.name().to_string());
        }
        let distribution = self
            .selection
            .column
            .as_deref()
            .and_then(|name| distribution(&dataset, name, HISTOGRAM_BINS));

        self.explorer = ExplorerState::Loaded(Box::new(LoadedDataset {
            dataset,
            summary,
            correlation,
            distribution,
        }));
    }

    /// Pick the distribution column and recompute the plot model.
    pub fn select_column(&mut self, column: &str) {
        if self.selection.column.as_deref() == Some(column) {
            return;
        }
        let ExplorerState::Loaded(loaded) = &mut self.explorer else {
            return;
        };
        let Some(dist) = distribution(&loaded.dataset, column, HISTOGRAM_BINS) else {
            log::warn!("Column '{column}' is not numeric; keeping current distribution");
            return;
        };
        log::debug!("Recomputed distribution for '{column}'");
        loaded.distribution = Some(dist);
        self.selection.column = Some(column.to_string());
    }

    /// Names offered by the distribution column selector.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.dataset()
            .map(|ds| ds.numeric_columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// CSV bytes of the current dataset, if one is loaded.
    pub fn export_bytes(&self) -> Option<anyhow::Result<Vec<u8>>> {
        self.dataset().map(to_csv_bytes)
    }
}

fn describe_source(source: Option<&DataSource>) -> String {
    match source {
        Some(DataSource::Upload { file_name, .. }) => format!("upload '{file_name}'"),
        Some(DataSource::Sample(name)) => format!("sample '{name}'"),
        None => "nothing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_iris_loaded() {
        let state = AppState::default();
        let loaded = state.loaded().expect("Iris should load at start-up");
        assert_eq!(loaded.summary.shape, (150, 5));
        assert_eq!(state.numeric_column_names().len(), 4);
        assert_eq!(loaded.correlation.as_ref().map(|m| m.len()), Some(4));
        assert_eq!(state.selection.column.as_deref(), Some("sepal_length"));
        assert!(loaded.distribution.is_some());
    }

    #[test]
    fn test_unsupported_upload_leaves_explorer_empty() {
        let mut state = AppState::default();
        state.upload("data.txt".to_string(), b"a,b\n1,2\n".to_vec());
        assert!(matches!(state.explorer, ExplorerState::Empty));
        assert!(state.status_message.is_some());
        assert!(state.export_bytes().is_none());
    }

    #[test]
    fn test_upload_mode_without_file_is_empty_without_error() {
        let mut state = AppState::default();
        state.set_source(SourceKind::Upload);
        assert!(state.loaded().is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_unknown_sample_leaves_explorer_empty() {
        let mut state = AppState::default();
        state.apply_source(Some(&DataSource::Sample("Penguins".to_string())));
        assert!(state.loaded().is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_column_selection() {
        let mut state = AppState::default();
        state.select_column("petal_width");
        let dist = state.loaded().unwrap().distribution.as_ref().unwrap();
        assert_eq!(dist.column, "petal_width");
        assert_eq!(dist.bins.len(), 30);

        // Non-numeric columns are never selected.
        state.select_column("species");
        assert_eq!(state.selection.column.as_deref(), Some("petal_width"));
    }

    #[test]
    fn test_switching_to_titanic_falls_back_to_numeric_column() {
        let mut state = AppState::default();
        state.select_column("petal_width");
        state.set_sample(SampleDataset::Titanic);
        assert_eq!(state.selection.column.as_deref(), Some("survived"));

        state.select_column("age");
        let dist = state.loaded().unwrap().distribution.as_ref().unwrap();
        assert_eq!(dist.bins.len(), 30);
        assert!(dist.box_summary.is_some());
    }

    #[test]
    fn test_no_numeric_columns_upload() {
        let mut state = AppState::default();
        state.upload("names.csv".to_string(), b"name\nann\nbob\n".to_vec());
        let loaded = state.loaded().unwrap();
        assert!(loaded.correlation.is_none());
        assert!(loaded.distribution.is_none());
        assert!(state.selection.column.is_none());
        assert!(state.numeric_column_names().is_empty());
    }

    #[test]
    fn test_failed_upload_discards_previous_dataset() {
        let mut state = AppState::default();
        state.upload("good.csv".to_string(), b"x\n1\n2\n".to_vec());
        assert!(state.loaded().is_some());
        state.upload("bad.csv".to_string(), b"x\n1,2\n".to_vec());
        assert!(state.loaded().is_none());
    }

    #[test]
    fn test_export_bytes_round_trip() {
        let state = AppState::default();
        let bytes = state.export_bytes().unwrap().unwrap();
        let mut other = AppState::default();
        other.upload(crate::config::EXPORT_FILE_NAME.to_string(), bytes);
        assert_eq!(other.dataset(), state.dataset());
    }
}
