//! Error conversion helpers for client and I/O operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::error::Error;
use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::InfraResult;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&path, &status)
    ///     .with_path_context("write status", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Extension trait for lifting orchestration client errors with model context.
pub trait ClientResultExt<T> {
    fn with_model_context(self, action: &str, model: &str) -> ApplicationResult<T>;
}

impl<T> ClientResultExt<T> for InfraResult<T> {
    fn with_model_context(self, action: &str, model: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{} in {}", action, model),
            source: Box::new(e),
        })
    }
}

/// Render an error with its full source chain on one line.
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        out.push_str(": ");
        out.push_str(&source.to_string());
        current = source.source();
    }
    out
}
