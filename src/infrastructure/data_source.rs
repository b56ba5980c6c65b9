use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::Infrastructure;
use crate::utils::{string, WithSchema};

use super::state::InfrastructureDataSourceState;
use super::INFRASTRUCTURES_PATH;

#[derive(Debug, Clone, Default)]
pub struct InfrastructureDataSource {
    pub(super) client: ClientHandle,
}

impl InfrastructureDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for InfrastructureDataSource {
    type State<'a> = InfrastructureDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(InfrastructureDataSourceState::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let infrastructure = lookup::<Infrastructure, _>(
            diags,
            &self.client,
            INFRASTRUCTURES_PATH,
            "infrastructure",
            &label,
            |_| true,
        )
        .await?;

        let mut state = config;
        state.update_from(infrastructure);
        Some(state)
    }
}
