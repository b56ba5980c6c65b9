use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueMap, ValueString};

use crate::model::ExtensionInstance;
use crate::utils::{computed_string, id_to_string, variables_to_map, WithSchema};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtensionInstanceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub infrastructure_id: ValueString<'a>,
    pub extension_id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub input_variables: ValueMap<'a, ValueString<'a>>,
    pub output_variables: ValueMap<'a, ValueString<'a>>,
    pub service_status: ValueString<'a>,
}

impl<'a> ExtensionInstanceState<'a> {
    /// Whether an attribute sent in the PATCH body differs from `prior`
    pub fn needs_patch(&self, prior: &Self) -> bool {
        self.label != prior.label || self.input_variables != prior.input_variables
    }

    pub fn update_from(&mut self, instance: ExtensionInstance) {
        self.id = ValueString::from(id_to_string(instance.id));
        self.infrastructure_id = ValueString::from(id_to_string(instance.infrastructure_id));
        self.extension_id = ValueString::from(id_to_string(instance.extension_id));
        self.label = ValueString::from(instance.label);
        self.input_variables = variables_to_map(&self.input_variables, instance.input_variables);
        // Always known once created, even when empty
        self.output_variables = variables_to_map(&ValueMap::Unknown, instance.output_variables);
        self.service_status = ValueString::from(instance.service_status);
    }
}

impl<'a> WithSchema for ExtensionInstanceState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => computed_string("Id of the extension instance"),
                    "infrastructure_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the infrastructure the extension is instantiated in, changing it replaces the instance"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "extension_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the instantiated extension, changing it replaces the instance"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the extension instance, generated by MetalCloud if omitted"),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "input_variables" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Inputs given to the extension"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "output_variables" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Outputs produced by the extension"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "service_status" => computed_string("Service status of the extension instance"),
                },
                description: Description::plain("Instance of a MetalCloud extension within an infrastructure"),
                ..Default::default()
            },
        }
    }
}
