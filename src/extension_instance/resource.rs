use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueMap, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::model::{ExtensionInstance, ExtensionInstanceCreate, ExtensionInstanceUpdate};
use crate::utils::{optional_string, report, required_id, validate_id, variables, WithSchema};

use super::state::ExtensionInstanceState;
use super::{extension_instance_path, extension_instances_path};

#[derive(Debug, Clone, Default)]
pub struct ExtensionInstanceResource {
    client: ClientHandle,
}

impl ExtensionInstanceResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ExtensionInstanceResource {
    type State<'a> = ExtensionInstanceState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ExtensionInstanceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.infrastructure_id, "infrastructure_id");
        validate_id(diags, &config.extension_id, "extension_id");

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

        match client
            .get::<ExtensionInstance>(&extension_instance_path(id))
            .await
        {
            Ok(instance) => {
                let mut state = state;
                state.update_from(instance);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Extension instance not found, removing it from state");
                None
            }
            Err(err) => {
                report(diags, "Failed to read extension instance", &err);
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
        state.output_variables = ValueMap::Unknown;
        if state.label.is_null() {
            state.label = ValueString::Unknown;
        }

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
        if proposed_state.extension_id != prior_state.extension_id {
            trigger_replace.push(AttributePath::new("extension_id"));
        }

        let mut state = proposed_state;
        if state.needs_patch(&prior_state) {
            // Outputs are recomputed by the API on every change
            state.output_variables = ValueMap::Unknown;
            state.service_status = ValueString::Unknown;
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
        let infrastructure_id =
            required_id(diags, &planned_state.infrastructure_id, "infrastructure_id")?;
        let extension_id = required_id(diags, &planned_state.extension_id, "extension_id")?;

        let body = ExtensionInstanceCreate {
            extension_id,
            label: optional_string(&planned_state.label),
            input_variables: variables(&planned_state.input_variables),
        };
        match client
            .create::<_, ExtensionInstance>(&extension_instances_path(infrastructure_id), &body)
            .await
        {
            Ok(instance) => {
                info!(id = instance.id, infrastructure_id, extension_id, "Created extension instance");
                let mut state = planned_state;
                state.update_from(instance);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to create extension instance", &err);
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
        let client = self.client.client(diags)?;
        let id = required_id(diags, &prior_state.id, "id")?;
        let path = extension_instance_path(id);

        let current = match client.get::<ExtensionInstance>(&path).await {
            Ok(current) => current,
            Err(err) => {
                report(diags, "Failed to read extension instance before update", &err);
                return None;
            }
        };

        let body = ExtensionInstanceUpdate {
            label: optional_string(&planned_state.label),
            input_variables: variables(&planned_state.input_variables),
        };
        match client
            .update::<_, ExtensionInstance>(&path, current.revision, &body)
            .await
        {
            Ok(instance) => {
                info!(id, "Updated extension instance");
                let mut state = planned_state;
                state.update_from(instance);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to update extension instance", &err);
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

        match client.delete(&extension_instance_path(id)).await {
            Ok(()) => {
                info!(id, "Deleted extension instance");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Extension instance already deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "Failed to delete extension instance", &err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = ExtensionInstanceState {
            id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
