mod data_source;
mod resource;
mod state;

pub use data_source::InfrastructureDataSource;
pub use resource::InfrastructureResource;
pub use state::{InfrastructureDataSourceState, InfrastructureState};

pub(crate) const INFRASTRUCTURES_PATH: &str = "/api/v2/infrastructures";
