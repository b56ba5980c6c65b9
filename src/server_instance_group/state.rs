use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueMap, ValueNumber, ValueString};

use crate::model::ServerInstanceGroup;
use crate::utils::{computed_string, id_to_string, optional_id_to_value, variables_to_map, WithSchema};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerInstanceGroupState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub infrastructure_id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub server_type_id: ValueString<'a>,
    pub instance_count: ValueNumber,
    pub os_template_id: ValueString<'a>,
    pub custom_variables: ValueMap<'a, ValueString<'a>>,
    pub service_status: ValueString<'a>,
}

impl<'a> ServerInstanceGroupState<'a> {
    /// Whether an attribute sent in the PATCH body differs from `prior`
    pub fn needs_patch(&self, prior: &Self) -> bool {
        self.label != prior.label
            || self.server_type_id != prior.server_type_id
            || self.instance_count != prior.instance_count
            || self.custom_variables != prior.custom_variables
    }

    pub fn update_from(&mut self, group: ServerInstanceGroup) {
        self.id = ValueString::from(id_to_string(group.id));
        self.infrastructure_id = ValueString::from(id_to_string(group.infrastructure_id));
        self.label = ValueString::from(group.label);
        self.server_type_id = ValueString::from(id_to_string(group.default_server_type_id));
        self.instance_count = Value::Value(group.instance_count);
        self.os_template_id = optional_id_to_value(group.os_template_id);
        self.custom_variables = variables_to_map(&self.custom_variables, group.custom_variables);
        self.service_status = ValueString::from(group.service_status);
    }
}

impl<'a> WithSchema for ServerInstanceGroupState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => computed_string("Id of the server instance group"),
                    "infrastructure_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the infrastructure owning the group, changing it replaces the group"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the group, generated by MetalCloud if omitted"),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "server_type_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the server type of the instances"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "instance_count" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Number of instances in the group"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "os_template_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the OS template installed on the instances, changing it replaces the group"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "custom_variables" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Custom variables of the group"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "service_status" => computed_string("Service status of the group"),
                },
                description: Description::plain("Group of bare metal server instances of a MetalCloud infrastructure"),
                ..Default::default()
            },
        }
    }
}
