use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueString};

use crate::model::LogicalNetwork;
use crate::utils::{computed_string, id_to_string, optional_id_to_value, WithSchema};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogicalNetworkState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub fabric_id: ValueString<'a>,
    pub kind: ValueString<'a>,
    pub infrastructure_id: ValueString<'a>,
    pub vlan_id: ValueNumber,
    pub service_status: ValueString<'a>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogicalNetworkDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub fabric_id: ValueString<'a>,
    pub id: ValueString<'a>,
    pub kind: ValueString<'a>,
    pub vlan_id: ValueNumber,
}

fn vlan_to_value(vlan_id: Option<i64>) -> ValueNumber {
    match vlan_id {
        Some(vlan_id) => Value::Value(vlan_id),
        None => Value::Null,
    }
}

impl<'a> LogicalNetworkState<'a> {
    /// Whether an attribute sent in the PATCH body differs from `prior`
    pub fn needs_patch(&self, prior: &Self) -> bool {
        self.label != prior.label || self.vlan_id != prior.vlan_id
    }

    pub fn update_from(&mut self, network: LogicalNetwork) {
        self.id = ValueString::from(id_to_string(network.id));
        self.label = ValueString::from(network.label);
        self.fabric_id = ValueString::from(id_to_string(network.fabric_id));
        self.kind = ValueString::from(network.kind);
        self.infrastructure_id = optional_id_to_value(network.infrastructure_id);
        self.vlan_id = vlan_to_value(network.vlan_id);
        self.service_status = ValueString::from(network.service_status);
    }
}

impl<'a> LogicalNetworkDataSourceState<'a> {
    pub fn update_from(&mut self, network: LogicalNetwork) {
        self.id = ValueString::from(id_to_string(network.id));
        self.fabric_id = ValueString::from(id_to_string(network.fabric_id));
        self.kind = ValueString::from(network.kind);
        self.vlan_id = vlan_to_value(network.vlan_id);
    }
}

impl<'a> WithSchema for LogicalNetworkState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => computed_string("Id of the logical network"),
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the logical network"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "fabric_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the fabric carrying the network, changing it replaces the network"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "kind" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Kind of the network (eg: vlan, vxlan), changing it replaces the network"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "infrastructure_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the infrastructure owning the network, changing it replaces the network"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "vlan_id" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("VLAN of the network, allocated by MetalCloud if omitted"),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "service_status" => computed_string("Service status of the logical network"),
                },
                description: Description::plain("MetalCloud logical network"),
                ..Default::default()
            },
        }
    }
}

impl<'a> WithSchema for LogicalNetworkDataSourceState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the logical network to look up"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "fabric_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Restrict the lookup to a fabric"),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the logical network"),
                    "kind" => computed_string("Kind of the logical network"),
                    "vlan_id" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("VLAN of the network"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("Look up a MetalCloud logical network by label"),
                ..Default::default()
            },
        }
    }
}
