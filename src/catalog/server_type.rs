use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::ServerType;
use crate::utils::{computed_string, id_to_string, string, WithSchema};

use super::SERVER_TYPES_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerTypeState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub processor_cores: ValueNumber,
    pub ram_gbytes: ValueNumber,
}

impl<'a> WithSchema for ServerTypeState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the server type"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the server type"),
                    "name" => computed_string("Display name of the server type"),
                    "processor_cores" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Total number of processor cores"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "ram_gbytes" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Memory in GB"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("Look up a MetalCloud bare metal server type by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerTypeDataSource {
    client: ClientHandle,
}

impl ServerTypeDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ServerTypeDataSource {
    type State<'a> = ServerTypeState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ServerTypeState::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let server_type = lookup::<ServerType, _>(
            diags,
            &self.client,
            SERVER_TYPES_PATH,
            "server type",
            &label,
            |_| true,
        )
        .await?;

        Some(ServerTypeState {
            id: ValueString::from(id_to_string(server_type.id)),
            name: ValueString::from(server_type.name),
            processor_cores: Value::Value(server_type.processor_cores),
            ram_gbytes: Value::Value(server_type.ram_gbytes),
            ..config
        })
    }
}
