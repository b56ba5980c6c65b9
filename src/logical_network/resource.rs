use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{ValueEmpty, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::ClientHandle;
use crate::model::{LogicalNetwork, LogicalNetworkCreate, LogicalNetworkUpdate};
use crate::utils::{optional_id, report, required_id, string, validate_id, WithSchema};

use super::state::LogicalNetworkState;
use super::{logical_network_path, LOGICAL_NETWORKS_PATH};

#[derive(Debug, Clone, Default)]
pub struct LogicalNetworkResource {
    client: ClientHandle,
}

impl LogicalNetworkResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for LogicalNetworkResource {
    type State<'a> = LogicalNetworkState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(LogicalNetworkState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.fabric_id, "fabric_id");
        validate_id(diags, &config.infrastructure_id, "infrastructure_id");
        if let Some(vlan_id) = config.vlan_id.as_ref_option() {
            if !(1..=4094).contains(vlan_id) {
                diags.error(
                    "Invalid `vlan_id`",
                    format!("VLAN ids range from 1 to 4094, got {vlan_id}"),
                    AttributePath::new("vlan_id"),
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

        match client.get::<LogicalNetwork>(&logical_network_path(id)).await {
            Ok(network) => {
                let mut state = state;
                state.update_from(network);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Logical network not found, removing it from state");
                None
            }
            Err(err) => {
                report(diags, "Failed to read logical network", &err);
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
        if state.vlan_id.is_null() {
            state.vlan_id = ValueNumber::Unknown;
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
        if proposed_state.fabric_id != prior_state.fabric_id {
            trigger_replace.push(AttributePath::new("fabric_id"));
        }
        if proposed_state.kind != prior_state.kind {
            trigger_replace.push(AttributePath::new("kind"));
        }
        if proposed_state.infrastructure_id != prior_state.infrastructure_id {
            trigger_replace.push(AttributePath::new("infrastructure_id"));
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
        let fabric_id = required_id(diags, &planned_state.fabric_id, "fabric_id")?;
        let infrastructure_id =
            optional_id(diags, &planned_state.infrastructure_id, "infrastructure_id")?;

        let body = LogicalNetworkCreate {
            label: string(&planned_state.label),
            fabric_id,
            kind: string(&planned_state.kind),
            infrastructure_id,
            vlan_id: planned_state.vlan_id.as_ref_option().copied(),
        };
        match client
            .create::<_, LogicalNetwork>(LOGICAL_NETWORKS_PATH, &body)
            .await
        {
            Ok(network) => {
                info!(id = network.id, fabric_id, kind = %network.kind, "Created logical network");
                let mut state = planned_state;
                state.update_from(network);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to create logical network", &err);
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
        let path = logical_network_path(id);

        let current = match client.get::<LogicalNetwork>(&path).await {
            Ok(current) => current,
            Err(err) => {
                report(diags, "Failed to read logical network before update", &err);
                return None;
            }
        };

        let body = LogicalNetworkUpdate {
            label: string(&planned_state.label),
            vlan_id: planned_state.vlan_id.as_ref_option().copied(),
        };
        match client
            .update::<_, LogicalNetwork>(&path, current.revision, &body)
            .await
        {
            Ok(network) => {
                info!(id, "Updated logical network");
                let mut state = planned_state;
                state.update_from(network);
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "Failed to update logical network", &err);
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

        match client.delete(&logical_network_path(id)).await {
            Ok(()) => {
                info!(id, "Deleted logical network");
                Some(())
            }
            Err(err) if err.is_not_found() => {
                warn!(id, "Logical network already deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "Failed to delete logical network", &err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = LogicalNetworkState {
            id: ValueString::from(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
