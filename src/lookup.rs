//! Lookup of API objects by label

use serde::de::DeserializeOwned;
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{ApiResult, Client, ClientHandle};
use crate::model::{
    Extension, Fabric, Infrastructure, LogicalNetwork, LogicalNetworkProfile, OsTemplate,
    ServerType, Site, VmType,
};
use crate::utils::report;

pub(crate) trait Labeled {
    fn label(&self) -> &str;
}

macro_rules! labeled {
    ($($t:ty),* $(,)?) => {
        $(
            impl Labeled for $t {
                fn label(&self) -> &str {
                    &self.label
                }
            }
        )*
    };
}

labeled!(
    Site,
    Fabric,
    ServerType,
    VmType,
    OsTemplate,
    Extension,
    LogicalNetworkProfile,
    LogicalNetwork,
    Infrastructure,
);

/// List the objects of a collection with the given label
///
/// The label is filtered by the server, and checked again locally.
pub(crate) async fn find_by_label<T>(client: &Client, path: &str, label: &str) -> ApiResult<Vec<T>>
where
    T: Labeled + DeserializeOwned + Send,
{
    let items: Vec<T> = client
        .list(path, &[("filter.label", format!("$eq:{label}"))])
        .await?;
    Ok(items
        .into_iter()
        .filter(|item| item.label() == label)
        .collect())
}

/// Extract the only match of a lookup, or record why there is not exactly one
pub(crate) fn single<T>(
    diags: &mut Diagnostics,
    kind: &'static str,
    label: &str,
    matches: Vec<T>,
) -> Option<T> {
    let count = matches.len();
    let mut matches = matches.into_iter();
    match (matches.next(), count) {
        (Some(item), 1) => Some(item),
        (None, _) => {
            diags.error(
                format!("No {kind} found"),
                format!("There is no {kind} with the label `{label}`"),
                AttributePath::new("label"),
            );
            None
        }
        (Some(_), count) => {
            diags.error(
                format!("Ambiguous {kind}"),
                format!("{count} objects of type {kind} have the label `{label}`"),
                AttributePath::new("label"),
            );
            None
        }
    }
}

/// Look up the only object of a collection with the given label
///
/// `keep` narrows the matches further before checking there is exactly one.
pub(crate) async fn lookup<T, F>(
    diags: &mut Diagnostics,
    client: &ClientHandle,
    path: &str,
    kind: &'static str,
    label: &str,
    keep: F,
) -> Option<T>
where
    T: Labeled + DeserializeOwned + Send,
    F: Fn(&T) -> bool + Send,
{
    let client = client.client(diags)?;
    let matches = match find_by_label::<T>(&client, path, label).await {
        Ok(matches) => matches,
        Err(err) => {
            report(diags, format!("Failed to look up {kind}"), &err);
            return None;
        }
    };
    let matches = matches.into_iter().filter(|item| keep(item)).collect();
    single(diags, kind, label, matches)
}
