use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::OsTemplate;
use crate::utils::{computed_string, id_to_string, string, WithSchema};

use super::OS_TEMPLATES_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OsTemplateState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub device_type: ValueString<'a>,
}

impl<'a> WithSchema for OsTemplateState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the OS template"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the OS template"),
                    "name" => computed_string("Display name of the OS template"),
                    "device_type" => computed_string("Type of device the template can be installed on (eg: server, switch)"),
                },
                description: Description::plain("Look up a MetalCloud OS template by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OsTemplateDataSource {
    client: ClientHandle,
}

impl OsTemplateDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for OsTemplateDataSource {
    type State<'a> = OsTemplateState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(OsTemplateState::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let template = lookup::<OsTemplate, _>(
            diags,
            &self.client,
            OS_TEMPLATES_PATH,
            "OS template",
            &label,
            |_| true,
        )
        .await?;

        Some(OsTemplateState {
            id: ValueString::from(id_to_string(template.id)),
            name: ValueString::from(template.name),
            device_type: ValueString::from(template.device_type),
            ..config
        })
    }
}
