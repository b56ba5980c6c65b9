mod resource;
mod state;

pub use resource::ServerInstanceGroupResource;
pub use state::ServerInstanceGroupState;

pub(crate) fn server_instance_groups_path(infrastructure_id: i64) -> String {
    format!("/api/v2/infrastructures/{infrastructure_id}/server-instance-groups")
}

pub(crate) fn server_instance_group_path(id: i64) -> String {
    format!("/api/v2/server-instance-groups/{id}")
}
