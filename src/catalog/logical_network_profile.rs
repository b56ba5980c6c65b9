use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::LogicalNetworkProfile;
use crate::utils::{computed_string, id_to_string, optional_id, string, validate_id, WithSchema};

use super::LOGICAL_NETWORK_PROFILES_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogicalNetworkProfileState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub fabric_id: ValueString<'a>,
    pub id: ValueString<'a>,
    pub kind: ValueString<'a>,
}

impl<'a> WithSchema for LogicalNetworkProfileState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the logical network profile"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "fabric_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Restrict the lookup to the profiles of a fabric"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the profile"),
                    "kind" => computed_string("Kind of the networks created from the profile"),
                },
                description: Description::plain("Look up a MetalCloud logical network profile by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogicalNetworkProfileDataSource {
    client: ClientHandle,
}

impl LogicalNetworkProfileDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for LogicalNetworkProfileDataSource {
    type State<'a> = LogicalNetworkProfileState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(LogicalNetworkProfileState::schema())
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
        let profile = lookup(
            diags,
            &self.client,
            LOGICAL_NETWORK_PROFILES_PATH,
            "logical network profile",
            &label,
            |profile: &LogicalNetworkProfile| {
                fabric_id.map_or(true, |fabric_id| profile.fabric_id == Some(fabric_id))
            },
        )
        .await?;

        Some(LogicalNetworkProfileState {
            id: ValueString::from(id_to_string(profile.id)),
            kind: ValueString::from(profile.kind),
            ..config
        })
    }
}
