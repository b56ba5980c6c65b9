use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::Extension;
use crate::utils::{computed_string, id_to_string, string, WithSchema};

use super::EXTENSIONS_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtensionState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub id: ValueString<'a>,
    pub kind: ValueString<'a>,
    pub status: ValueString<'a>,
}

impl<'a> WithSchema for ExtensionState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the extension"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the extension"),
                    "kind" => computed_string("Kind of the extension (eg: workflow, application)"),
                    "status" => computed_string("Publication status of the extension"),
                },
                description: Description::plain("Look up a MetalCloud extension by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtensionDataSource {
    client: ClientHandle,
}

impl ExtensionDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ExtensionDataSource {
    type State<'a> = ExtensionState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ExtensionState::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let extension = lookup::<Extension, _>(
            diags,
            &self.client,
            EXTENSIONS_PATH,
            "extension",
            &label,
            |_| true,
        )
        .await?;

        Some(ExtensionState {
            id: ValueString::from(id_to_string(extension.id)),
            kind: ValueString::from(extension.kind),
            status: ValueString::from(extension.status),
            ..config
        })
    }
}
