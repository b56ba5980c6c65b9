mod data_source;
mod resource;
mod state;

pub use data_source::LogicalNetworkDataSource;
pub use resource::LogicalNetworkResource;
pub use state::{LogicalNetworkDataSourceState, LogicalNetworkState};

pub(crate) const LOGICAL_NETWORKS_PATH: &str = "/api/v2/logical-networks";

pub(crate) fn logical_network_path(id: i64) -> String {
    format!("{LOGICAL_NETWORKS_PATH}/{id}")
}
