//! Terraform provider for the MetalCloud bare metal cloud API

pub mod catalog;
pub mod client;
pub mod deploy;
pub mod drive;
pub mod extension_instance;
pub mod infrastructure;
pub mod infrastructure_deployer;
pub mod logical_network;
pub mod model;
pub mod server_instance_group;
pub mod vm_instance_group;

mod lookup;
mod provider;
mod utils;

pub use provider::{MetalCloudProvider, ProviderConfig};
pub use utils::{float_to_id, id_to_string, parse_id};
