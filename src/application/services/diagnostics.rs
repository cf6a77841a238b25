//! Diagnostics collected while tearing a model down
//!
//! Nothing in here may stop teardown: failures are logged and reported
//! back, never propagated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::error_ext::error_chain;
use crate::application::{ApplicationResult, IoResultExt};
use crate::cli::output;
use crate::infrastructure::traits::{FileSystem, ModelClient};

/// File receiving the model status.
pub const STATUS_FILE: &str = "status.txt";

/// File receiving the replayed debug log.
pub const DEBUG_LOG_FILE: &str = "debug-log.txt";

/// Service capturing status and logs of a model.
pub struct DiagnosticsService {
    fs: Arc<dyn FileSystem>,
}

impl DiagnosticsService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Print the model status; errors are logged, never raised.
    ///
    /// Returns the status text when it could be captured.
    pub fn safe_print_status(&self, client: &dyn ModelClient) -> Option<String> {
        match client.status_text() {
            Ok(status) => {
                output::info(&status);
                Some(status)
            }
            Err(e) => {
                warn!(
                    "cannot get status of {}: {}",
                    client.model_name(),
                    error_chain(&e)
                );
                None
            }
        }
    }

    /// Create the directory if absent.
    pub fn ensure_dir(&self, dir: &Path) -> ApplicationResult<()> {
        if !self.fs.is_dir(dir) {
            self.fs
                .create_dir_all(dir)
                .with_path_context("create log directory", dir)?;
        }
        Ok(())
    }

    /// Write status and debug log of the model into `dir`.
    ///
    /// Each artifact is attempted independently. Returns the files written.
    pub fn dump_env_logs(
        &self,
        client: &dyn ModelClient,
        status: Option<&str>,
        dir: &Path,
    ) -> Vec<PathBuf> {
        let model = client.model_name().to_string();
        debug!("dump_env_logs: model={}, dir={}", model, dir.display());

        if let Err(e) = self.ensure_dir(dir) {
            warn!("cannot collect logs for {}: {}", model, error_chain(&e));
            return Vec::new();
        }

        let status = match status {
            Some(s) => Ok(s.to_string()),
            None => client.status_text(),
        };
        let artifacts = [
            (STATUS_FILE, status),
            (DEBUG_LOG_FILE, client.debug_log()),
        ];

        let mut written = Vec::new();
        for (name, content) in artifacts {
            let path = dir.join(name);
            let content = match content {
                Ok(c) => c,
                Err(e) => {
                    warn!("cannot read {} of {}: {}", name, model, error_chain(&e));
                    continue;
                }
            };
            match self
                .fs
                .write(&path, &content)
                .with_path_context("write log", &path)
            {
                Ok(()) => written.push(path),
                Err(e) => warn!("{}", error_chain(&e)),
            }
        }
        written
    }
}
