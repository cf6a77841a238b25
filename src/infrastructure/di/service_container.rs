//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    AssessmentService, DiagnosticsService, LifecycleService, StackService,
};
use crate::config::Settings;
use crate::infrastructure::juju::{JujuClient, JujuOptions};
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    pub diagnostics: Arc<DiagnosticsService>,
    pub lifecycle: Arc<LifecycleService>,
    pub stack: Arc<StackService>,
    pub assessment: AssessmentService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let settings = Arc::new(settings);
        let diagnostics = Arc::new(DiagnosticsService::new(fs.clone()));
        let lifecycle = Arc::new(LifecycleService::new(diagnostics.clone()));
        let stack = Arc::new(StackService::new(settings.clone()));
        let assessment = AssessmentService::new(lifecycle.clone(), stack.clone());

        Self {
            settings,
            fs,
            cmd,
            diagnostics,
            lifecycle,
            stack,
            assessment,
        }
    }

    /// Client for the juju binary, sharing this container's command runner.
    pub fn juju_client(&self, options: JujuOptions) -> JujuClient {
        JujuClient::new(self.cmd.clone(), options)
    }
}
