//! Reference stack: deployment and token round-trip
//!
//! The stack is `dummy-source` related to an exposed `dummy-sink`. A token
//! written to the source's config is relayed to the sink, which reports it
//! as `Token is <value>` in its workload status.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, ClientResultExt};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{
    charm_url, env_token, parse_token_message, random_string, Series, DUMMY_SINK,
    DUMMY_SINK_UNIT, DUMMY_SOURCE, TOKEN_KEY,
};
use crate::infrastructure::traits::ModelClient;

/// Service deploying the reference stack and verifying it end to end.
pub struct StackService {
    settings: Arc<Settings>,
}

impl StackService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Deploy the dummy stack into the model and wait until a token
    /// round-trips through it.
    #[instrument(skip_all, fields(model = %client.model_name(), series = %series))]
    pub fn deploy_dummy_stack(
        &self,
        client: &dyn ModelClient,
        series: &Series,
    ) -> ApplicationResult<()> {
        let model = client.model_name().to_string();
        info!("deploying dummy stack into {}", model);

        for app in [DUMMY_SOURCE, DUMMY_SINK] {
            let charm = charm_url(&self.settings.charm_prefix, series, app);
            client
                .deploy(&charm, series.as_str())
                .with_model_context(&format!("deploy {charm}"), &model)?;
        }
        client
            .add_relation(DUMMY_SOURCE, DUMMY_SINK)
            .with_model_context("add-relation", &model)?;
        client
            .expose(DUMMY_SINK)
            .with_model_context("expose", &model)?;
        client
            .wait_for_started(self.settings.start_timeout())
            .with_model_context("wait for started", &model)?;

        let token = random_string();
        client
            .set_config(DUMMY_SOURCE, TOKEN_KEY, &token)
            .with_model_context("set token", &model)?;
        self.check_token(client, &token)?;
        Ok(())
    }

    /// Write a fresh token into the source and confirm the sink sees it.
    #[instrument(skip_all, fields(model = %client.model_name()))]
    pub fn check_services(&self, client: &dyn ModelClient) -> ApplicationResult<String> {
        let model = client.model_name().to_string();
        let token = env_token(&model);
        client
            .set_config(DUMMY_SOURCE, TOKEN_KEY, &token)
            .with_model_context("set token", &model)?;
        output::print_now(&format!("checking services in {}", model));
        self.check_token(client, &token)
    }

    /// Poll the sink until its reported token contains `token`.
    ///
    /// Returns the observed token.
    pub fn check_token(&self, client: &dyn ModelClient, token: &str) -> ApplicationResult<String> {
        let model = client.model_name().to_string();
        let timeout = self.settings.token_timeout();
        let start = Instant::now();
        let mut found: Option<String> = None;

        info!("waiting for token in {}", model);
        loop {
            client
                .check_deadline()
                .with_model_context("check token", &model)?;

            let message = client
                .workload_message(DUMMY_SINK_UNIT)
                .with_model_context("read sink status", &model)?;
            if let Some(value) = message.as_deref().and_then(parse_token_message) {
                if value.contains(token) {
                    debug!("check_token: found {}", value);
                    return Ok(value.to_string());
                }
                found = Some(value.to_string());
            }

            if start.elapsed() >= timeout {
                break;
            }
            thread::sleep(self.settings.poll_interval());
        }

        Err(ApplicationError::TokenMismatch {
            model,
            expected: token.to_string(),
            found,
        })
    }
}
