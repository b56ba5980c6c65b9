//! Read-only lookups in the MetalCloud catalog

mod extension;
mod fabric;
mod logical_network_profile;
mod os_template;
mod server_type;
mod site;
mod vm_type;

pub use extension::{ExtensionDataSource, ExtensionState};
pub use fabric::{FabricDataSource, FabricState};
pub use logical_network_profile::{LogicalNetworkProfileDataSource, LogicalNetworkProfileState};
pub use os_template::{OsTemplateDataSource, OsTemplateState};
pub use server_type::{ServerTypeDataSource, ServerTypeState};
pub use site::{SiteDataSource, SiteState};
pub use vm_type::{VmTypeDataSource, VmTypeState};

pub(crate) const SITES_PATH: &str = "/api/v2/sites";
pub(crate) const FABRICS_PATH: &str = "/api/v2/network-fabrics";
pub(crate) const SERVER_TYPES_PATH: &str = "/api/v2/server-types";
pub(crate) const VM_TYPES_PATH: &str = "/api/v2/vm-types";
pub(crate) const OS_TEMPLATES_PATH: &str = "/api/v2/os-templates";
pub(crate) const EXTENSIONS_PATH: &str = "/api/v2/extensions";
pub(crate) const LOGICAL_NETWORK_PROFILES_PATH: &str = "/api/v2/logical-network-profiles";

#[cfg(test)]
mod tests;
