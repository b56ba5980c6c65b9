use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::model::{ServerInstanceGroup, ServerInstanceGroupCreate, ServerInstanceGroupUpdate};
use crate::utils::{
    optional_id, optional_string, report, required_id, required_number, validate_id, variables,
    WithSchema,
};

use super::state::ServerInstanceGroupState;
use super::{server_instance_group_path, server_instance_groups_path};

#[derive(Debug, Clone, Default)]
pub struct ServerInstanceGroupResource {
    client: ClientHandle,
}

impl ServerInstanceGroupResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ServerInstanceGroupResource {
    type State<'a> = ServerInstanceGroupState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ServerInstanceGroupState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.infrastructure_id, "infrastructure_id");
        validate_id(diags, &config.server_type_id, "server_type_id");
        validate_id(diags, &config.os_template_id, "os_template_id");
        if let Some(count) = config.instance_count.as_ref_option() {
            if *count < 0 {
                diags.error(
                    "Invalid `instance_count`",
                    format!("The number of instances cannot be negative, got {count}"),
                    AttributePath::new("instance_count"),
                );
            }
        }

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
            .get::<ServerInstanceGroup>(&server_instance_group_path(id))
            .await
        {
            Ok(group) => {
                let mut state = state;
                state.update_from(group);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Server instance group not found, removing it from state");
                None
            }
            Err(err) => {
                report(diags, "Failed to read server instance group", &err);
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
        if proposed_state.os_template_id != prior_state.os_template_id {
            trigger_replace.push(AttributePath::new("os_template_id"));
        }

        let mut state = proposed_state;
        if state.needs_patch(&prior_state) {
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
        let server_type_id = required_id(diags, &planned_state.server_type_id, "server_type_id")?;
        let instance_count = required_number(diags, &planned_state.instance_count, "instance_count")?;
        let os_template_id = optional_id(diags, &planned_state.os_template_id, "os_template_id")?;

        let body = ServerInstanceGroupCreate {
            label: optional_string(&planned_state.label),
            default_server_type_id: server_type_id,
            instance_count,
            os_template_id,
            custom_variables: variables(&planned_state.custom_variables),
        };
        match client
            .create::<_, ServerInstanceGroup>(&server_instance_groups_path(infrastructure_id), &body)
            .await
        {
            Ok(group) => {
                info!(id = group.id, infrastructure_id, "Created server instance group");
                let mut state = planned_state;
                state.update_from(group);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to create server instance group", &err);
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
        let server_type_id = required_id(diags, &planned_state.server_type_id, "server_type_id")?;
        let instance_count = required_number(diags, &planned_state.instance_count, "instance_count")?;
        let path = server_instance_group_path(id);

        let current = match client.get::<ServerInstanceGroup>(&path).await {
            Ok(current) => current,
            Err(err) => {
                report(diags, "Failed to read server instance group before update", &err);
                return None;
            }
        };

        let body = ServerInstanceGroupUpdate {
            label: optional_string(&planned_state.label),
            default_server_type_id: server_type_id,
            instance_count,
            custom_variables: variables(&planned_state.custom_variables),
        };
        match client
            .update::<_, ServerInstanceGroup>(&path, current.revision, &body)
            .await
        {
            Ok(group) => {
                info!(id, instance_count, "Updated server instance group");
                let mut state = planned_state;
                state.update_from(group);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to update server instance group", &err);
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

        match client.delete(&server_instance_group_path(id)).await {
            Ok(()) => {
                info!(id, "Deleted server instance group");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Server instance group already deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "Failed to delete server instance group", &err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = ServerInstanceGroupState {
            id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
