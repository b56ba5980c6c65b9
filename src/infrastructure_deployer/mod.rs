//! Deploy of the pending changes of an infrastructure

mod resource;
mod state;

pub use resource::InfrastructureDeployerResource;
pub use state::InfrastructureDeployerState;
