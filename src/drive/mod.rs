mod resource;
mod state;

pub use resource::DriveResource;
pub use state::DriveState;

pub(crate) fn drives_path(infrastructure_id: i64) -> String {
    format!("/api/v2/infrastructures/{infrastructure_id}/drives")
}

pub(crate) fn drive_path(id: i64) -> String {
    format!("/api/v2/drives/{id}")
}

#[cfg(test)]
mod tests;
