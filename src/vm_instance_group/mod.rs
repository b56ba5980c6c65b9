mod resource;
mod state;

pub use resource::VmInstanceGroupResource;
pub use state::VmInstanceGroupState;

pub(crate) fn vm_instance_groups_path(infrastructure_id: i64) -> String {
    format!("/api/v2/infrastructures/{infrastructure_id}/vm-instance-groups")
}

pub(crate) fn vm_instance_group_path(id: i64) -> String {
    format!("/api/v2/vm-instance-groups/{id}")
}

#[cfg(test)]
mod tests;
