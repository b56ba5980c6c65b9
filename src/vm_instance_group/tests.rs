use serde_json::json;
use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::fake::FakeTransport;
use crate::client::{ClientHandle, Method};

use super::*;

const CREATE_PATH: &str = "/api/v2/infrastructures/5/vm-instance-groups";
const PATH: &str = "/api/v2/vm-instance-groups/21";

fn group(instance_count: i64) -> serde_json::Value {
    json!({
        "id": 21,
        "revision": 2,
        "infrastructureId": 5,
        "label": "vms",
        "defaultVmTypeId": 7,
        "instanceCount": instance_count,
        "diskSizeGbytes": 40,
        "osTemplateId": 9,
        "serviceStatus": "ordered",
    })
}

fn prior<'a>() -> VmInstanceGroupState<'a> {
    VmInstanceGroupState {
        id: ValueString::from("21"),
        infrastructure_id: ValueString::from("5"),
        label: ValueString::from("vms"),
        vm_type_id: ValueString::from("7"),
        instance_count: Value::Value(1),
        disk_size_gbytes: Value::Value(40),
        os_template_id: ValueString::from("9"),
        service_status: ValueString::from("ordered"),
        ..Default::default()
    }
}

fn resource(fake: &FakeTransport) -> VmInstanceGroupResource {
    VmInstanceGroupResource::new(ClientHandle::new(fake.client()))
}

#[tokio::test]
async fn create_sends_disk_and_template() {
    let fake = FakeTransport::new();
    fake.on(Method::Post, CREATE_PATH, 200, group(1));

    let planned = VmInstanceGroupState {
        id: Value::Unknown,
        label: Value::Unknown,
        service_status: Value::Unknown,
        ..prior()
    };
    let mut diags = Diagnostics::default();
    let (created, _) = Resource::create(
        &resource(&fake),
        &mut diags,
        planned.clone(),
        planned,
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();

    assert!(diags.errors.is_empty());
    assert_eq!(created.id, ValueString::from("21"));
    assert_eq!(created.os_template_id, ValueString::from("9"));
    let body = fake.sent(Method::Post)[0].body.clone().unwrap();
    assert_eq!(body["diskSizeGbytes"], json!(40));
    assert_eq!(body["osTemplateId"], json!(9));
    assert_eq!(body["defaultVmTypeId"], json!(7));
}

#[tokio::test]
async fn disk_and_type_changes_force_replacement() {
    let fake = FakeTransport::new();
    let proposed = VmInstanceGroupState {
        vm_type_id: ValueString::from("8"),
        disk_size_gbytes: Value::Value(80),
        ..prior()
    };

    let mut diags = Diagnostics::default();
    let (_, _, replace) = Resource::plan_update(
        &resource(&fake),
        &mut diags,
        prior(),
        proposed.clone(),
        proposed,
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        replace,
        vec![
            AttributePath::new("vm_type_id"),
            AttributePath::new("disk_size_gbytes"),
        ]
    );
}

#[tokio::test]
async fn scaling_updates_in_place() {
    let fake = FakeTransport::new();
    fake.on(Method::Get, PATH, 200, group(1))
        .on(Method::Patch, PATH, 200, group(3));

    let planned = VmInstanceGroupState {
        instance_count: Value::Value(3),
        ..prior()
    };
    let mut diags = Diagnostics::default();
    let (_, _, replace) = Resource::plan_update(
        &resource(&fake),
        &mut diags,
        prior(),
        planned.clone(),
        planned.clone(),
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();
    assert!(replace.is_empty());

    let (updated, _) = Resource::update(
        &resource(&fake),
        &mut diags,
        prior(),
        planned.clone(),
        planned,
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();

    assert!(diags.errors.is_empty());
    assert_eq!(updated.instance_count, Value::Value(3));
    assert_eq!(fake.sent(Method::Patch)[0].if_match, Some(2));
}

#[tokio::test]
async fn negative_disk_size_is_rejected() {
    let fake = FakeTransport::new();
    let config = VmInstanceGroupState {
        disk_size_gbytes: Value::Value(-10),
        ..prior()
    };

    let mut diags = Diagnostics::default();
    assert!(Resource::validate(&resource(&fake), &mut diags, config).await.is_none());
    assert_eq!(diags.errors.len(), 1);
    assert_eq!(diags.errors[0].attribute, AttributePath::new("disk_size_gbytes"));
}

#[tokio::test]
async fn destroy_already_deleted_is_success() {
    let fake = FakeTransport::new();
    fake.on(Method::Delete, PATH, 404, json!(null));

    let mut diags = Diagnostics::default();
    let destroyed = Resource::destroy(
        &resource(&fake),
        &mut diags,
        prior(),
        Default::default(),
        Default::default(),
    )
    .await;

    assert_eq!(destroyed, Some(()));
    assert!(diags.errors.is_empty());
}

#[tokio::test]
async fn rename_plans_unknown_status() {
    let fake = FakeTransport::new();
    let proposed = VmInstanceGroupState {
        label: ValueString::from("batch"),
        ..prior()
    };

    let mut diags = Diagnostics::default();
    let (planned, _, replace) = Resource::plan_update(
        &resource(&fake),
        &mut diags,
        prior(),
        proposed.clone(),
        proposed,
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();

    assert!(replace.is_empty());
    assert!(planned.service_status.is_unknown());
}

#[tokio::test]
async fn unchanged_plan_keeps_status() {
    let fake = FakeTransport::new();

    let mut diags = Diagnostics::default();
    let (planned, _, _) = Resource::plan_update(
        &resource(&fake),
        &mut diags,
        prior(),
        prior(),
        prior(),
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();

    assert_eq!(planned.service_status, prior().service_status);
}
