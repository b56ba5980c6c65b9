mod resource;
mod state;

pub use resource::ExtensionInstanceResource;
pub use state::ExtensionInstanceState;

pub(crate) fn extension_instances_path(infrastructure_id: i64) -> String {
    format!("/api/v2/infrastructures/{infrastructure_id}/extension-instances")
}

pub(crate) fn extension_instance_path(id: i64) -> String {
    format!("/api/v2/extension-instances/{id}")
}

#[cfg(test)]
mod tests;
