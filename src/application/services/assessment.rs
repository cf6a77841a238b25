//! Hosted environment deploy assessment
//!
//! Deploys the reference stack into the controller model, then into a
//! hosted model `env1` and a hosted model `env2` nested under it, and
//! finally checks all three stacks in that order.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::application::services::{BootPlan, LifecycleService, StackService};
use crate::application::{ApplicationResult, ClientResultExt};
use crate::domain::Series;
use crate::infrastructure::traits::ModelClient;

/// Suffix of the first hosted model.
pub const FIRST_HOSTED: &str = "env1";

/// Suffix of the second hosted model (nested under the first).
pub const SECOND_HOSTED: &str = "env2";

/// Service running the whole assessment.
pub struct AssessmentService {
    lifecycle: Arc<LifecycleService>,
    stack: Arc<StackService>,
}

impl AssessmentService {
    pub fn new(lifecycle: Arc<LifecycleService>, stack: Arc<StackService>) -> Self {
        Self { lifecycle, stack }
    }

    /// Make sure the binary can create hosted models.
    pub fn prepare_client(&self, client: &mut dyn ModelClient) -> ApplicationResult<()> {
        let enabled = client
            .is_jes_enabled()
            .with_model_context("check hosted model support", client.controller_name())?;
        if !enabled {
            info!("enabling hosted models");
            client
                .enable_jes()
                .with_model_context("enable hosted models", client.controller_name())?;
        }
        Ok(())
    }

    /// Prepare, bootstrap, assess, tear down.
    pub fn run(
        &self,
        client: &mut dyn ModelClient,
        plan: &BootPlan,
        series: &Series,
    ) -> ApplicationResult<()> {
        self.prepare_client(client)?;
        let client: &dyn ModelClient = client;
        self.lifecycle.with_boot_context(client, plan, |client| {
            self.test_jes_deploy(client, series, &plan.log_dir)
        })
    }

    /// Deploy the dummy stack into the controller model and two hosted models.
    pub fn test_jes_deploy(
        &self,
        client: &dyn ModelClient,
        series: &Series,
        log_dir: &Path,
    ) -> ApplicationResult<()> {
        self.stack.deploy_dummy_stack(client, series)?;

        self.lifecycle
            .with_hosted_environment(client, log_dir, FIRST_HOSTED, |env1| {
                self.stack.deploy_dummy_stack(env1, series)?;
                self.lifecycle
                    .with_hosted_environment(env1, log_dir, SECOND_HOSTED, |env2| {
                        self.stack.deploy_dummy_stack(env2, series)?;
                        for model in [client, env1, env2] {
                            self.stack.check_services(model)?;
                        }
                        Ok(())
                    })
            })?;

        info!("all stacks reachable");
        Ok(())
    }
}
