use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::deploy::{self, infrastructure_path, AwaitTarget, DeployError, PollSettings};
use crate::model::{DeployOptions, Infrastructure, InfrastructureCreate, InfrastructureUpdate};
use crate::utils::{flag, report, required_id, string, validate_id, variables, WithSchema};

use super::state::InfrastructureState;
use super::INFRASTRUCTURES_PATH;

#[derive(Debug, Clone, Default)]
pub struct InfrastructureResource {
    pub(super) client: ClientHandle,
    pub(super) poll: PollSettings,
}

impl InfrastructureResource {
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
}

#[async_trait]
impl Resource for InfrastructureResource {
    type State<'a> = InfrastructureState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(InfrastructureState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.site_id, "site_id");

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
            required_id(diags, &state.id, "id"),
        ) else {
            return Some((state, private_state));
        };

        match client.get::<Infrastructure>(&infrastructure_path(id)).await {
            Ok(infrastructure) if infrastructure.service_status == "deleted" => {
                warn!(id, "Infrastructure has been deleted, removing it from state");
                None
            }
            Ok(infrastructure) => {
                let mut state = state;
                state.update_from(infrastructure);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Infrastructure not found, removing it from state");
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
        state.id = ValueString::Unknown;
        state.service_status = ValueString::Unknown;
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
        if proposed_state.site_id != prior_state.site_id {
            trigger_replace.push(AttributePath::new("site_id"));
        }

        let mut state = proposed_state;
        if state.needs_patch(&prior_state) {
            state.service_status = ValueString::Unknown;
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
        let client = self.client.client(diags)?;
        let site_id = required_id(diags, &planned_state.site_id, "site_id")?;

        let body = InfrastructureCreate {
            label: string(&planned_state.label),
            site_id,
            custom_variables: variables(&planned_state.custom_variables),
        };
        match client
            .create::<_, Infrastructure>(INFRASTRUCTURES_PATH, &body)
            .await
        {
            Ok(infrastructure) => {
                info!(id = infrastructure.id, "Created infrastructure");
                let mut state = planned_state;
                state.update_from(infrastructure);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to create infrastructure", &err);
                None
            }
        }
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        if !planned_state.needs_patch(&prior_state) {
            // Only the local delete settings changed
            return Some((planned_state, planned_private_state));
        }
        let client = self.client.client(diags)?;
        let id = required_id(diags, &prior_state.id, "id")?;
        let path = infrastructure_path(id);

        let current = match client.get::<Infrastructure>(&path).await {
            Ok(current) => current,
            Err(err) => {
                report(diags, "Failed to read infrastructure before update", &err);
                return None;
            }
        };

        let body = InfrastructureUpdate {
            label: string(&planned_state.label),
            custom_variables: variables(&planned_state.custom_variables),
        };
        match client
            .update::<_, Infrastructure>(&path, current.revision, &body)
            .await
        {
            Ok(infrastructure) => {
                info!(id, "Updated infrastructure");
                let mut state = planned_state;
                state.update_from(infrastructure);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to update infrastructure", &err);
                None
            }
        }
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.client(diags)?;
        let id = required_id(diags, &prior_state.id, "id")?;

        match client.delete(&infrastructure_path(id)).await {
            Ok(()) => info!(id, "Deleted infrastructure"),
            Err(err) if err.is_not_found() => {
                warn!(id, "Infrastructure already deleted");
                return Some(());
            }
            Err(err) => {
                report(diags, "Failed to delete infrastructure", &err);
                return None;
            }
        }

        if flag(&prior_state.await_delete_finished, false) {
            let options = DeployOptions::new(flag(&prior_state.allow_data_loss, false));
            let result = match deploy::deploy(&client, id, &options).await {
                Ok(()) => deploy::await_status(&client, id, AwaitTarget::Deleted, self.poll).await,
                Err(err) => Err(DeployError::from(err)),
            };
            if let Err(err) = result {
                diags.root_error(err.summary(), err.to_string());
                return None;
            }
        }

        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = InfrastructureState {
            id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
