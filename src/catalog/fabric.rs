use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::Fabric;
use crate::utils::{computed_string, id_to_string, optional_id, string, validate_id, WithSchema};

use super::FABRICS_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FabricState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub site_id: ValueString<'a>,
    pub id: ValueString<'a>,
    pub fabric_type: ValueString<'a>,
}

impl<'a> WithSchema for FabricState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the network fabric"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "site_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Restrict the lookup to the fabrics of a site"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the fabric"),
                    "fabric_type" => computed_string("Type of the fabric (eg: ethernet, fibre_channel)"),
                },
                description: Description::plain("Look up a MetalCloud network fabric by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FabricDataSource {
    client: ClientHandle,
}

impl FabricDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for FabricDataSource {
    type State<'a> = FabricState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(FabricState::schema())
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
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let site_id = optional_id(diags, &config.site_id, "site_id")?;
        let fabric = lookup(
            diags,
            &self.client,
            FABRICS_PATH,
            "fabric",
            &label,
            |fabric: &Fabric| site_id.map_or(true, |site_id| fabric.site_id == Some(site_id)),
        )
        .await?;

        Some(FabricState {
            id: ValueString::from(id_to_string(fabric.id)),
            fabric_type: ValueString::from(fabric.fabric_type),
            ..config
        })
    }
}
