use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::model::{VmInstanceGroup, VmInstanceGroupCreate, VmInstanceGroupUpdate};
use crate::utils::{
    optional_id, optional_string, report, required_id, required_number, validate_id, variables,
    WithSchema,
};

use super::state::VmInstanceGroupState;
use super::{vm_instance_group_path, vm_instance_groups_path};

#[derive(Debug, Clone, Default)]
pub struct VmInstanceGroupResource {
    client: ClientHandle,
}

impl VmInstanceGroupResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for VmInstanceGroupResource {
    type State<'a> = VmInstanceGroupState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(VmInstanceGroupState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.infrastructure_id, "infrastructure_id");
        validate_id(diags, &config.vm_type_id, "vm_type_id");
        validate_id(diags, &config.os_template_id, "os_template_id");
        for (attribute, value) in [
            ("instance_count", &config.instance_count),
            ("disk_size_gbytes", &config.disk_size_gbytes),
        ] {
            if let Some(n) = value.as_ref_option() {
                if *n < 0 {
                    diags.error(
                        format!("Invalid `{attribute}`"),
                        format!("`{attribute}` cannot be negative, got {n}"),
                        AttributePath::new(attribute),
                    );
                }
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

        match client.get::<VmInstanceGroup>(&vm_instance_group_path(id)).await {
            Ok(group) => {
                let mut state = state;
                state.update_from(group);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "VM instance group not found, removing it from state");
                None
            }
            Err(err) => {
                report(diags, "Failed to read VM instance group", &err);
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
        if proposed_state.vm_type_id != prior_state.vm_type_id {
            trigger_replace.push(AttributePath::new("vm_type_id"));
        }
        if proposed_state.disk_size_gbytes != prior_state.disk_size_gbytes {
            trigger_replace.push(AttributePath::new("disk_size_gbytes"));
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
        let vm_type_id = required_id(diags, &planned_state.vm_type_id, "vm_type_id")?;
        let instance_count = required_number(diags, &planned_state.instance_count, "instance_count")?;
        let disk_size_gbytes =
            required_number(diags, &planned_state.disk_size_gbytes, "disk_size_gbytes")?;
        let os_template_id = optional_id(diags, &planned_state.os_template_id, "os_template_id")?;

        let body = VmInstanceGroupCreate {
            label: optional_string(&planned_state.label),
            default_vm_type_id: vm_type_id,
            instance_count,
            disk_size_gbytes,
            os_template_id,
            custom_variables: variables(&planned_state.custom_variables),
        };
        match client
            .create::<_, VmInstanceGroup>(&vm_instance_groups_path(infrastructure_id), &body)
            .await
        {
            Ok(group) => {
                info!(id = group.id, infrastructure_id, "Created VM instance group");
                let mut state = planned_state;
                state.update_from(group);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to create VM instance group", &err);
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
        let instance_count = required_number(diags, &planned_state.instance_count, "instance_count")?;
        let path = vm_instance_group_path(id);

        let current = match client.get::<VmInstanceGroup>(&path).await {
            Ok(current) => current,
            Err(err) => {
                report(diags, "Failed to read VM instance group before update", &err);
                return None;
            }
        };

        let body = VmInstanceGroupUpdate {
            label: optional_string(&planned_state.label),
            instance_count,
            custom_variables: variables(&planned_state.custom_variables),
        };
        match client
            .update::<_, VmInstanceGroup>(&path, current.revision, &body)
            .await
        {
            Ok(group) => {
                info!(id, instance_count, "Updated VM instance group");
                let mut state = planned_state;
                state.update_from(group);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to update VM instance group", &err);
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

        match client.delete(&vm_instance_group_path(id)).await {
            Ok(()) => {
                info!(id, "Deleted VM instance group");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "VM instance group already deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "Failed to delete VM instance group", &err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = VmInstanceGroupState {
            id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
