use crate::common::error::BaselineError;

/// Result alias used across the crate
pub type BaselineResult<T> = Result<T, BaselineError>;

/// Conversion helpers from foreign results into [`BaselineResult`]
pub trait ResultExt<T, E> {
    /// Wrap the error as a file-system failure on `path`
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> BaselineResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> BaselineResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| BaselineError::filesystem_error_with_source(message, path, e.into()))
    }
}
