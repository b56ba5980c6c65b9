use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueString};

use crate::model::Drive;
use crate::utils::{computed_string, id_to_string, optional_id_to_value, WithSchema};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriveState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub infrastructure_id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub size_mbytes: ValueNumber,
    pub storage_type: ValueString<'a>,
    pub server_instance_group_id: ValueString<'a>,
    pub service_status: ValueString<'a>,
}

impl<'a> DriveState<'a> {
    /// Whether an attribute sent in the PATCH body differs from `prior`
    pub fn needs_patch(&self, prior: &Self) -> bool {
        self.label != prior.label
            || self.size_mbytes != prior.size_mbytes
            || self.server_instance_group_id != prior.server_instance_group_id
    }

    pub fn update_from(&mut self, drive: Drive) {
        self.id = ValueString::from(id_to_string(drive.id));
        self.infrastructure_id = ValueString::from(id_to_string(drive.infrastructure_id));
        self.label = ValueString::from(drive.label);
        self.size_mbytes = Value::Value(drive.size_mbytes);
        self.storage_type = ValueString::from(drive.storage_type);
        self.server_instance_group_id = optional_id_to_value(drive.server_instance_group_id);
        self.service_status = ValueString::from(drive.service_status);
    }
}

impl<'a> WithSchema for DriveState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => computed_string("Id of the drive"),
                    "infrastructure_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the infrastructure owning the drive, changing it replaces the drive"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the drive, generated by MetalCloud if omitted"),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "size_mbytes" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Size of the drive in MB"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "storage_type" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Storage type of the drive, changing it replaces the drive"),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "server_instance_group_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Id of the server instance group the drive is attached to"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "service_status" => computed_string("Service status of the drive"),
                },
                description: Description::plain("Block storage drive of a MetalCloud infrastructure"),
                ..Default::default()
            },
        }
    }
}
