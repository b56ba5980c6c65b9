use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueBool, ValueMap, ValueString};

use crate::model::Infrastructure;
use crate::utils::{computed_string, id_to_string, variables_to_map, WithSchema};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InfrastructureState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub site_id: ValueString<'a>,
    pub custom_variables: ValueMap<'a, ValueString<'a>>,
    pub service_status: ValueString<'a>,
    pub deploy_status: ValueString<'a>,
    pub await_delete_finished: ValueBool,
    pub allow_data_loss: ValueBool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InfrastructureDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub id: ValueString<'a>,
    pub site_id: ValueString<'a>,
    pub service_status: ValueString<'a>,
    pub deploy_status: ValueString<'a>,
}

impl<'a> InfrastructureState<'a> {
    /// Whether an attribute sent in the PATCH body differs from `prior`
    pub fn needs_patch(&self, prior: &Self) -> bool {
        self.label != prior.label || self.custom_variables != prior.custom_variables
    }

    /// Refresh the state with the infrastructure returned by the API
    pub fn update_from(&mut self, infrastructure: Infrastructure) {
        self.id = ValueString::from(id_to_string(infrastructure.id));
        self.label = ValueString::from(infrastructure.label);
        self.site_id = ValueString::from(id_to_string(infrastructure.site_id));
        self.custom_variables =
            variables_to_map(&self.custom_variables, infrastructure.custom_variables);
        self.service_status = ValueString::from(infrastructure.service_status);
        self.deploy_status = ValueString::from(infrastructure.config.deploy_status);
    }
}

impl<'a> InfrastructureDataSourceState<'a> {
    pub fn update_from(&mut self, infrastructure: Infrastructure) {
        self.id = ValueString::from(id_to_string(infrastructure.id));
        self.site_id = ValueString::from(id_to_string(infrastructure.site_id));
        self.service_status = ValueString::from(infrastructure.service_status);
        self.deploy_status = ValueString::from(infrastructure.config.deploy_status);
        self.label = ValueString::from(infrastructure.label);
    }
}

impl<'a> WithSchema for InfrastructureState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => computed_string("Id of the infrastructure"),
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the infrastructure"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "site_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the site hosting the infrastructure, changing it replaces the infrastructure"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "custom_variables" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Custom variables of the infrastructure"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "service_status" => computed_string("Service status of the infrastructure"),
                    "deploy_status" => computed_string("Status of the last deploy of the infrastructure"),
                    "await_delete_finished" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Deploy the deletion and wait for it to finish when destroying (default: false)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "allow_data_loss" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Allow the deletion deploy to lose data (default: false)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("MetalCloud infrastructure"),
                ..Default::default()
            },
        }
    }
}

impl<'a> WithSchema for InfrastructureDataSourceState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the infrastructure to look up"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the infrastructure"),
                    "site_id" => computed_string("Id of the site hosting the infrastructure"),
                    "service_status" => computed_string("Service status of the infrastructure"),
                    "deploy_status" => computed_string("Status of the last deploy of the infrastructure"),
                },
                description: Description::plain("Look up a MetalCloud infrastructure by label"),
                ..Default::default()
            },
        }
    }
}
