//! Wire representation of the MetalCloud objects handled by the provider

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Numeric identifiers are not consistently typed by the API:
/// they can be integers, floats, or numeric strings.
mod id {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Integer(i64),
        Float(f64),
        String(String),
    }

    impl RawId {
        fn into_id<E: Error>(self) -> Result<i64, E> {
            match self {
                RawId::Integer(id) => Ok(id),
                RawId::Float(id) => crate::utils::float_to_id(id)
                    .ok_or_else(|| E::custom(format!("{id} is not a valid id"))),
                RawId::String(id) => id
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("`{id}` is not a valid id"))),
            }
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        RawId::deserialize(deserializer)?.into_id()
    }

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Option::<RawId>::deserialize(deserializer)?
            .map(RawId::into_id)
            .transpose()
    }
}

/// Treat an explicit `null` like a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub type Variables = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureConfig {
    #[serde(default, deserialize_with = "null_default")]
    pub deploy_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infrastructure {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "id::required")]
    pub revision: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "id::required")]
    pub site_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub service_status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub config: InfrastructureConfig,
    #[serde(default, deserialize_with = "null_default")]
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureCreate {
    pub label: String,
    pub site_id: i64,
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureUpdate {
    pub label: String,
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOptions {
    pub allow_data_loss: bool,
    pub attempt_soft_shutdown: bool,
    pub soft_shutdown_timeout: i64,
    pub hard_shutdown_after_timeout: bool,
}

impl DeployOptions {
    pub fn new(allow_data_loss: bool) -> Self {
        Self {
            allow_data_loss,
            attempt_soft_shutdown: true,
            soft_shutdown_timeout: 180,
            hard_shutdown_after_timeout: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInstanceGroup {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "id::required")]
    pub revision: i64,
    #[serde(deserialize_with = "id::required")]
    pub infrastructure_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "id::required")]
    pub default_server_type_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub instance_count: i64,
    #[serde(default, deserialize_with = "id::optional")]
    pub os_template_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub custom_variables: Variables,
    #[serde(default, deserialize_with = "null_default")]
    pub service_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInstanceGroupCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub default_server_type_id: i64,
    pub instance_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_template_id: Option<i64>,
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInstanceGroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub default_server_type_id: i64,
    pub instance_count: i64,
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmInstanceGroup {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "id::required")]
    pub revision: i64,
    #[serde(deserialize_with = "id::required")]
    pub infrastructure_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "id::required")]
    pub default_vm_type_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub instance_count: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub disk_size_gbytes: i64,
    #[serde(default, deserialize_with = "id::optional")]
    pub os_template_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub custom_variables: Variables,
    #[serde(default, deserialize_with = "null_default")]
    pub service_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmInstanceGroupCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub default_vm_type_id: i64,
    pub instance_count: i64,
    pub disk_size_gbytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_template_id: Option<i64>,
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmInstanceGroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub instance_count: i64,
    pub custom_variables: Variables,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "id::required")]
    pub revision: i64,
    #[serde(deserialize_with = "id::required")]
    pub infrastructure_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub size_mbytes: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub storage_type: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub server_instance_group_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub service_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub size_mbytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_instance_group_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub size_mbytes: i64,
    /// Explicit `null` detaches the drive
    pub server_instance_group_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalNetwork {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "id::required")]
    pub revision: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "id::required")]
    pub fabric_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub infrastructure_id: Option<i64>,
    #[serde(default, deserialize_with = "id::optional")]
    pub vlan_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub service_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalNetworkCreate {
    pub label: String,
    pub fabric_id: i64,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalNetworkUpdate {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInstance {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "id::required")]
    pub revision: i64,
    #[serde(deserialize_with = "id::required")]
    pub infrastructure_id: i64,
    #[serde(deserialize_with = "id::required")]
    pub extension_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub input_variables: Variables,
    #[serde(default, deserialize_with = "null_default")]
    pub output_variables: Variables,
    #[serde(default, deserialize_with = "null_default")]
    pub service_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInstanceCreate {
    pub extension_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInstanceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_variables: Variables,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fabric {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub site_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub fabric_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerType {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub processor_cores: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub ram_gbytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmType {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cpu_cores: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub ram_gbytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsTemplate {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub device_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalNetworkProfile {
    #[serde(deserialize_with = "id::required")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "id::optional")]
    pub fabric_id: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub kind: String,
}
