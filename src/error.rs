use thiserror::Error;

/// Reasons a dataset could not be acquired. None of them is fatal: the
/// explorer drops back to its empty state and shows the message.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("Unsupported file type for '{file_name}': expected .csv or .xlsx")]
    UnsupportedFormat { file_name: String },

    #[error("Could not parse '{file_name}': {reason}")]
    Parse { file_name: String, reason: String },

    #[error("Unknown sample dataset '{name}'")]
    UnknownSample { name: String },
}

impl ExploreError {
    /// Fold an `anyhow` context chain into a parse error.
    pub fn parse(file_name: &str, err: &anyhow::Error) -> Self {
        ExploreError::Parse {
            file_name: file_name.to_string(),
            reason: format!("{err:#}"),
        }
    }
}
