use serde_json::json;
use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::client::fake::FakeTransport;
use crate::client::{ClientHandle, Method};

use super::*;

fn client(fake: &FakeTransport) -> ClientHandle {
    ClientHandle::new(fake.client())
}

#[tokio::test]
async fn site_by_label() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        SITES_PATH,
        200,
        json!({"data": [{"id": 1, "label": "uk-london", "name": "London"}]}),
    );

    let mut diags = Diagnostics::default();
    let site = DataSource::read(
        &SiteDataSource::new(client(&fake)),
        &mut diags,
        SiteState {
            label: ValueString::from("uk-london"),
            ..Default::default()
        },
        Default::default(),
    )
    .await
    .unwrap();

    assert!(diags.errors.is_empty());
    assert_eq!(site.id, ValueString::from("1"));
    assert_eq!(site.name, ValueString::from("London"));
    assert_eq!(site.label, ValueString::from("uk-london"));
}

#[tokio::test]
async fn missing_site_is_an_error() {
    let fake = FakeTransport::new();
    fake.on(Method::Get, SITES_PATH, 200, json!([]));

    let mut diags = Diagnostics::default();
    let site = DataSource::read(
        &SiteDataSource::new(client(&fake)),
        &mut diags,
        SiteState {
            label: ValueString::from("uk-reading"),
            ..Default::default()
        },
        Default::default(),
    )
    .await;

    assert!(site.is_none());
    assert_eq!(diags.errors.len(), 1);
    assert_eq!(diags.errors[0].summary, "No site found");
    assert_eq!(diags.errors[0].attribute, AttributePath::new("label"));
}

#[tokio::test]
async fn fabric_restricted_to_site() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        FABRICS_PATH,
        200,
        json!([
            {"id": 10, "label": "data", "siteId": 1, "fabricType": "ethernet"},
            {"id": 11, "label": "data", "siteId": 2, "fabricType": "fibre_channel"},
        ]),
    );
    let data_source = FabricDataSource::new(client(&fake));

    let mut diags = Diagnostics::default();
    let fabric = DataSource::read(
        &data_source,
        &mut diags,
        FabricState {
            label: ValueString::from("data"),
            site_id: ValueString::from("2"),
            ..Default::default()
        },
        Default::default(),
    )
    .await
    .unwrap();
    assert!(diags.errors.is_empty());
    assert_eq!(fabric.id, ValueString::from("11"));
    assert_eq!(fabric.fabric_type, ValueString::from("fibre_channel"));

    let mut diags = Diagnostics::default();
    let ambiguous = DataSource::read(
        &data_source,
        &mut diags,
        FabricState {
            label: ValueString::from("data"),
            ..Default::default()
        },
        Default::default(),
    )
    .await;
    assert!(ambiguous.is_none());
    assert_eq!(diags.errors[0].summary, "Ambiguous fabric");
}

#[tokio::test]
async fn server_type_exposes_capacity() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        SERVER_TYPES_PATH,
        200,
        json!({"data": [{
            "id": "3",
            "label": "M.8.8",
            "name": "M.8.8.2",
            "processorCores": 8,
            "ramGbytes": 8,
        }]}),
    );

    let mut diags = Diagnostics::default();
    let server_type = DataSource::read(
        &ServerTypeDataSource::new(client(&fake)),
        &mut diags,
        ServerTypeState {
            label: ValueString::from("M.8.8"),
            ..Default::default()
        },
        Default::default(),
    )
    .await
    .unwrap();

    assert_eq!(server_type.id, ValueString::from("3"));
    assert_eq!(server_type.processor_cores, Value::Value(8));
    assert_eq!(server_type.ram_gbytes, Value::Value(8));
}

#[tokio::test]
async fn vm_type_by_label() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        VM_TYPES_PATH,
        200,
        json!([{"id": 7, "label": "small", "cpuCores": 2, "ramGbytes": 4}]),
    );

    let mut diags = Diagnostics::default();
    let vm_type = DataSource::read(
        &VmTypeDataSource::new(client(&fake)),
        &mut diags,
        VmTypeState {
            label: ValueString::from("small"),
            ..Default::default()
        },
        Default::default(),
    )
    .await
    .unwrap();

    assert_eq!(vm_type.id, ValueString::from("7"));
    assert_eq!(vm_type.cpu_cores, Value::Value(2));
}

#[tokio::test]
async fn os_template_by_label() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        OS_TEMPLATES_PATH,
        200,
        json!([{"id": 9, "label": "ubuntu-22.04", "name": "Ubuntu 22.04", "deviceType": "server"}]),
    );

    let mut diags = Diagnostics::default();
    let template = DataSource::read(
        &OsTemplateDataSource::new(client(&fake)),
        &mut diags,
        OsTemplateState {
            label: ValueString::from("ubuntu-22.04"),
            ..Default::default()
        },
        Default::default(),
    )
    .await
    .unwrap();

    assert_eq!(template.id, ValueString::from("9"));
    assert_eq!(template.device_type, ValueString::from("server"));
}

#[tokio::test]
async fn extension_lookup_failure_is_reported() {
    let fake = FakeTransport::new();
    fake.on(Method::Get, EXTENSIONS_PATH, 403, json!({"message": "forbidden"}));

    let mut diags = Diagnostics::default();
    let extension = DataSource::read(
        &ExtensionDataSource::new(client(&fake)),
        &mut diags,
        ExtensionState {
            label: ValueString::from("k8s"),
            ..Default::default()
        },
        Default::default(),
    )
    .await;

    assert!(extension.is_none());
    assert_eq!(diags.errors.len(), 1);
    assert_eq!(diags.errors[0].summary, "Failed to look up extension");
    assert!(diags.errors[0].detail.contains("403"));
}

#[tokio::test]
async fn logical_network_profile_by_fabric() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        LOGICAL_NETWORK_PROFILES_PATH,
        200,
        json!([
            {"id": 1, "label": "default", "fabricId": 10, "kind": "vlan"},
            {"id": 2, "label": "default", "fabricId": 11, "kind": "vxlan"},
        ]),
    );

    let mut diags = Diagnostics::default();
    let profile = DataSource::read(
        &LogicalNetworkProfileDataSource::new(client(&fake)),
        &mut diags,
        LogicalNetworkProfileState {
            label: ValueString::from("default"),
            fabric_id: ValueString::from("11"),
            ..Default::default()
        },
        Default::default(),
    )
    .await
    .unwrap();

    assert!(diags.errors.is_empty());
    assert_eq!(profile.id, ValueString::from("2"));
    assert_eq!(profile.kind, ValueString::from("vxlan"));
}
