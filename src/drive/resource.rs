use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::model::{Drive, DriveCreate, DriveUpdate};
use crate::utils::{
    optional_id, optional_string, report, required_id, required_number, validate_id, WithSchema,
};

use super::state::DriveState;
use super::{drive_path, drives_path};

#[derive(Debug, Clone, Default)]
pub struct DriveResource {
    client: ClientHandle,
}

impl DriveResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for DriveResource {
    type State<'a> = DriveState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DriveState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.infrastructure_id, "infrastructure_id");
        validate_id(diags, &config.server_instance_group_id, "server_instance_group_id");
        if let Some(size) = config.size_mbytes.as_ref_option() {
            if *size <= 0 {
                diags.error(
                    "Invalid `size_mbytes`",
                    format!("The size of a drive must be positive, got {size}"),
                    AttributePath::new("size_mbytes"),
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

        match client.get::<Drive>(&drive_path(id)).await {
            Ok(drive) => {
                let mut state = state;
                state.update_from(drive);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Drive not found, removing it from state");
                None
            }
            Err(err) => {
                report(diags, "Failed to read drive", &err);
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
        if state.storage_type.is_null() {
            state.storage_type = ValueString::Unknown;
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
        if proposed_state.storage_type != prior_state.storage_type {
            trigger_replace.push(AttributePath::new("storage_type"));
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
        let size_mbytes = required_number(diags, &planned_state.size_mbytes, "size_mbytes")?;
        let server_instance_group_id = optional_id(
            diags,
            &planned_state.server_instance_group_id,
            "server_instance_group_id",
        )?;

        let body = DriveCreate {
            label: optional_string(&planned_state.label),
            size_mbytes,
            storage_type: optional_string(&planned_state.storage_type),
            server_instance_group_id,
        };
        match client
            .create::<_, Drive>(&drives_path(infrastructure_id), &body)
            .await
        {
            Ok(drive) => {
                info!(id = drive.id, infrastructure_id, size_mbytes, "Created drive");
                let mut state = planned_state;
                state.update_from(drive);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to create drive", &err);
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
        let size_mbytes = required_number(diags, &planned_state.size_mbytes, "size_mbytes")?;
        let server_instance_group_id = optional_id(
            diags,
            &planned_state.server_instance_group_id,
            "server_instance_group_id",
        )?;
        let path = drive_path(id);

        let current = match client.get::<Drive>(&path).await {
            Ok(current) => current,
            Err(err) => {
                report(diags, "Failed to read drive before update", &err);
                return None;
            }
        };

        let body = DriveUpdate {
            label: optional_string(&planned_state.label),
            size_mbytes,
            server_instance_group_id,
        };
        match client
            .update::<_, Drive>(&path, current.revision, &body)
            .await
        {
            Ok(drive) => {
                info!(id, size_mbytes, "Updated drive");
                let mut state = planned_state;
                state.update_from(drive);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to update drive", &err);
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

        match client.delete(&drive_path(id)).await {
            Ok(()) => {
                info!(id, "Deleted drive");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Drive already deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "Failed to delete drive", &err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = DriveState {
            id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
