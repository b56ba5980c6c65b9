use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::LogicalNetwork;
use crate::utils::{optional_id, string, validate_id, WithSchema};

use super::state::LogicalNetworkDataSourceState;
use super::LOGICAL_NETWORKS_PATH;

#[derive(Debug, Clone, Default)]
pub struct LogicalNetworkDataSource {
    client: ClientHandle,
}

impl LogicalNetworkDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for LogicalNetworkDataSource {
    type State<'a> = LogicalNetworkDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(LogicalNetworkDataSourceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_id(diags, &config.fabric_id, "fabric_id");

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let fabric_id = optional_id(diags, &config.fabric_id, "fabric_id")?;
        let network = lookup(
            diags,
            &self.client,
            LOGICAL_NETWORKS_PATH,
            "logical network",
            &label,
            |network: &LogicalNetwork| fabric_id.map_or(true, |fabric_id| network.fabric_id == fabric_id),
        )
        .await?;

        let mut state = config;
        state.update_from(network);
        Some(state)
    }
}
