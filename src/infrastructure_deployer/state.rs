use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueBool, ValueMap, ValueString};

use crate::model::Infrastructure;
use crate::utils::{computed_string, id_to_string, WithSchema};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InfrastructureDeployerState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub infrastructure_id: ValueString<'a>,
    pub prevent_deploy: ValueBool,
    pub await_deploy_finished: ValueBool,
    pub allow_data_loss: ValueBool,
    pub triggers: ValueMap<'a, ValueString<'a>>,
    pub deploy_status: ValueString<'a>,
}

impl<'a> InfrastructureDeployerState<'a> {
    pub fn update_from(&mut self, infrastructure: Infrastructure) {
        self.id = ValueString::from(id_to_string(infrastructure.id));
        self.infrastructure_id = ValueString::from(id_to_string(infrastructure.id));
        self.deploy_status = ValueString::from(infrastructure.config.deploy_status);
    }
}

impl<'a> WithSchema for InfrastructureDeployerState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => computed_string("Id of the deployed infrastructure"),
                    "infrastructure_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the infrastructure to deploy, changing it replaces the deployer"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "prevent_deploy" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Skip the deploy, only tracking the infrastructure status (default: false)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "await_deploy_finished" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Wait for the deploy to finish (default: true)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "allow_data_loss" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Allow the deploy to lose data (default: false)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "triggers" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Arbitrary values, any change triggers a new deploy"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "deploy_status" => computed_string("Status of the last deploy of the infrastructure"),
                },
                description: Description::plain("Deploy the pending changes of a MetalCloud infrastructure"),
                ..Default::default()
            },
        }
    }
}
