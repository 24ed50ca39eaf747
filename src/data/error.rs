use thiserror::Error;

/// Problems with an uploaded dataset or with the user's window inputs.
///
/// None of these are fatal: the UI shows the message and falls back to an
/// empty view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("The file does not contain a 'time' column.")]
    MissingTimeColumn,

    #[error("No column contains 'First'.")]
    NoFeatureColumns,

    #[error("The 'time' column could not be parsed as timestamps.")]
    UnparsableTimeColumn,

    #[error("Invalid time format '{0}'! Please enter in HH:MM:SS format.")]
    InvalidTimeOfDay(String),

    #[error("No data in this time range!")]
    EmptyWindow,
}

impl DatasetError {
    /// Warnings are shown in a softer colour and do not reject the dataset.
    pub fn is_warning(&self) -> bool {
        matches!(self, DatasetError::EmptyWindow)
    }
}
