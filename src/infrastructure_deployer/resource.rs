use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::deploy::{deploy_and_await, infrastructure_path, PollSettings};
use crate::model::{DeployOptions, Infrastructure};
use crate::utils::{flag, id_to_string, parse_id, report, required_id, validate_id, WithSchema};

use super::state::InfrastructureDeployerState;

#[derive(Debug, Clone, Default)]
pub struct InfrastructureDeployerResource {
    client: ClientHandle,
    poll: PollSettings,
}

impl InfrastructureDeployerResource {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            poll: Default::default(),
        }
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    /// Deploy the infrastructure unless prevented, then refresh its deploy status
    async fn deploy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: InfrastructureDeployerState<'a>,
    ) -> Option<InfrastructureDeployerState<'a>> {
        let client = self.client.client(diags)?;
        let id = required_id(diags, &state.infrastructure_id, "infrastructure_id")?;

        if flag(&state.prevent_deploy, false) {
            info!(id, "Deploy prevented, only refreshing the infrastructure status");
        } else {
            let options = DeployOptions::new(flag(&state.allow_data_loss, false));
            let wait = flag(&state.await_deploy_finished, true).then_some(self.poll);
            if let Err(err) = deploy_and_await(&client, id, &options, wait).await {
                diags.root_error(err.summary(), err.to_string());
                return None;
            }
        }

        match client.get::<Infrastructure>(&infrastructure_path(id)).await {
            Ok(infrastructure) => {
                let mut state = state;
                state.update_from(infrastructure);
                Some(state)
            }
            Err(err) => {
                report(diags, "Failed to read infrastructure after deploy", &err);
                None
            }
        }
    }
}

#[async_trait]
impl Resource for InfrastructureDeployerResource {
    type State<'a> = InfrastructureDeployerState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(InfrastructureDeployerState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.infrastructure_id, "infrastructure_id");

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let (Some(client), Some(id)) = (
            self.client.client(diags),
            required_id(diags, &state.infrastructure_id, "infrastructure_id"),
        ) else {
            return Some((state, private_state));
        };

        match client.get::<Infrastructure>(&infrastructure_path(id)).await {
            Ok(infrastructure) => {
                let mut state = state;
                state.update_from(infrastructure);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Deployed infrastructure not found, removing deployer from state");
                None
            }
            Err(err) => {
                report(diags, "Failed to read infrastructure", &err);
                Some((state, private_state))
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        // Same canonical form as the id read back from the API
        state.id = match state.infrastructure_id.as_deref_option().map(parse_id) {
            Some(Ok(id)) => ValueString::from(id_to_string(id)),
            _ => ValueString::Unknown,
        };
        state.deploy_status = ValueString::Unknown;

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut trigger_replace = Vec::new();
        if proposed_state.infrastructure_id != prior_state.infrastructure_id {
            trigger_replace.push(AttributePath::new("infrastructure_id"));
        }

        let mut state = proposed_state;
        if !flag(&state.prevent_deploy, false) {
            state.deploy_status = ValueString::Unknown;
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = self.deploy(diags, planned_state).await?;
        Some((state, planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = self.deploy(diags, planned_state).await?;
        Some((state, planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        info!(
            infrastructure_id = prior_state.infrastructure_id.as_deref_option(),
            "Forgetting infrastructure deployer"
        );
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = InfrastructureDeployerState {
            id: ValueString::from(id.clone()),
            infrastructure_id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
