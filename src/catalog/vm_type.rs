use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{DataSource, Diagnostics};

use crate::client::ClientHandle;
use crate::lookup::lookup;
use crate::model::VmType;
use crate::utils::{computed_string, id_to_string, string, WithSchema};

use super::VM_TYPES_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VmTypeState<'a> {
    #[serde(borrow = "'a")]
    pub label: ValueString<'a>,
    pub id: ValueString<'a>,
    pub cpu_cores: ValueNumber,
    pub ram_gbytes: ValueNumber,
}

impl<'a> WithSchema for VmTypeState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "label" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Label of the VM type"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "id" => computed_string("Id of the VM type"),
                    "cpu_cores" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Number of virtual CPU cores"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "ram_gbytes" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Memory in GB"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("Look up a MetalCloud VM type by label"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VmTypeDataSource {
    client: ClientHandle,
}

impl VmTypeDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for VmTypeDataSource {
    type State<'a> = VmTypeState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(VmTypeState::schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let label = string(&config.label);
        let vm_type = lookup::<VmType, _>(
            diags,
            &self.client,
            VM_TYPES_PATH,
            "VM type",
            &label,
            |_| true,
        )
        .await?;

        Some(VmTypeState {
            id: ValueString::from(id_to_string(vm_type.id)),
            cpu_cores: Value::Value(vm_type.cpu_cores),
            ram_gbytes: Value::Value(vm_type.ram_gbytes),
            ..config
        })
    }
}
