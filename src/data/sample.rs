use super::loader::parse_csv;
use super::model::Dataset;
use crate::error::ExploreError;

/// Built-in datasets, bundled into the binary as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDataset {
    /// Fisher's iris measurements: 150 rows, 5 columns.
    Iris,
    /// Titanic passenger list: 891 rows in the usual 15-column layout.
    Titanic,
}

impl SampleDataset {
    pub const ALL: [SampleDataset; 2] = [SampleDataset::Iris, SampleDataset::Titanic];

    pub fn name(self) -> &'static str {
        match self {
            SampleDataset::Iris => "Iris",
            SampleDataset::Titanic => "Titanic",
        }
    }

    /// Case-sensitive lookup in the closed set of sample names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    fn file_name(self) -> &'static str {
        match self {
            SampleDataset::Iris => "iris.csv",
            SampleDataset::Titanic => "titanic.csv",
        }
    }

    fn csv(self) -> &'static str {
        match self {
            SampleDataset::Iris => include_str!("../../samples/iris.csv"),
            SampleDataset::Titanic => include_str!("../../samples/titanic.csv"),
        }
    }

    pub fn load(self) -> Result<Dataset, ExploreError> {
        parse_csv(self.csv().as_bytes()).map_err(|e| ExploreError::parse(self.file_name(), &e))
    }
}

/// Resolve a sample by name and load it.
pub fn load_sample(name: &str) -> Result<Dataset, ExploreError> {
    let sample = SampleDataset::from_name(name).ok_or_else(|| ExploreError::UnknownSample {
        name: name.to_string(),
    })?;
    sample.load()
}
