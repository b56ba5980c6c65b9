use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::Site;
use crate::utils::{computed_string, id_to_string, string, WithSchema};

use super::SITES_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
}

impl<'a> WithSchema for SiteState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the site"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the site"),
                    "name" => computed_string("Display name of the site"),
                },
                description: Description::plain("Look up a MetalCloud site (datacenter) by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SiteDataSource {
    client: ClientHandle,
}

impl SiteDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for SiteDataSource {
    type State<'a> = SiteState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(SiteState::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let site = lookup::<Site, _>(
            diags,
            &self.client,
            SITES_PATH,
            "site",
            &label,
            |_| true,
        )
        .await?;

        Some(SiteState {
            id: ValueString::from(id_to_string(site.id)),
            name: ValueString::from(site.name),
            ..config
        })
    }
}
