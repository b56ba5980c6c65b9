use serde_json::json;
use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::fake::FakeTransport;
use crate::client::{ClientHandle, Method};

use super::*;

const CREATE_PATH: &str = "/api/v2/infrastructures/5/drives";
const PATH: &str = "/api/v2/drives/30";

fn drive(server_instance_group_id: Option<i64>) -> serde_json::Value {
    json!({
        "id": 30.0,
        "revision": 6,
        "infrastructureId": "5",
        "label": "data",
        "sizeMbytes": 40960,
        "storageType": "iscsi_ssd",
        "serverInstanceGroupId": server_instance_group_id,
        "serviceStatus": "ordered",
    })
}

fn prior<'a>() -> DriveState<'a> {
    DriveState {
        id: ValueString::from("30"),
        infrastructure_id: ValueString::from("5"),
        label: ValueString::from("data"),
        size_mbytes: Value::Value(40960),
        storage_type: ValueString::from("iscsi_ssd"),
        server_instance_group_id: ValueString::from("12"),
        service_status: ValueString::from("ordered"),
    }
}

fn resource(fake: &FakeTransport) -> DriveResource {
    DriveResource::new(ClientHandle::new(fake.client()))
}

#[tokio::test]
async fn create_lets_api_pick_storage_type() {
    let fake = FakeTransport::new();
    fake.on(Method::Post, CREATE_PATH, 201, drive(None));

    let planned = DriveState {
        id: Value::Unknown,
        label: Value::Unknown,
        storage_type: Value::Unknown,
        server_instance_group_id: Value::Null,
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
    // Ids returned as floats or strings are normalized
    assert_eq!(created.id, ValueString::from("30"));
    assert_eq!(created.infrastructure_id, ValueString::from("5"));
    assert_eq!(created.storage_type, ValueString::from("iscsi_ssd"));
    assert!(created.server_instance_group_id.is_null());
    assert_eq!(
        fake.sent(Method::Post)[0].body,
        Some(json!({"sizeMbytes": 40960}))
    );
}

#[tokio::test]
async fn detaching_sends_explicit_null() {
    let fake = FakeTransport::new();
    fake.on(Method::Get, PATH, 200, drive(Some(12)))
        .on(Method::Patch, PATH, 200, drive(None));

    let planned = DriveState {
        server_instance_group_id: Value::Null,
        ..prior()
    };
    let mut diags = Diagnostics::default();
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
    assert!(updated.server_instance_group_id.is_null());
    let patch = &fake.sent(Method::Patch)[0];
    assert_eq!(patch.if_match, Some(6));
    assert_eq!(patch.body.as_ref().unwrap()["serverInstanceGroupId"], json!(null));
}

#[tokio::test]
async fn storage_type_change_forces_replacement() {
    let fake = FakeTransport::new();
    let proposed = DriveState {
        storage_type: ValueString::from("iscsi_hdd"),
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

    assert_eq!(replace, vec![AttributePath::new("storage_type")]);
}

#[tokio::test]
async fn empty_drive_is_rejected() {
    let fake = FakeTransport::new();
    let config = DriveState {
        size_mbytes: Value::Value(0),
        ..prior()
    };

    let mut diags = Diagnostics::default();
    assert!(Resource::validate(&resource(&fake), &mut diags, config).await.is_none());
    assert_eq!(diags.errors[0].attribute, AttributePath::new("size_mbytes"));
}

#[tokio::test]
async fn delete_failure_is_reported() {
    let fake = FakeTransport::new();
    fake.on(Method::Delete, PATH, 409, json!({"message": "drive is attached"}));

    let mut diags = Diagnostics::default();
    let destroyed = Resource::destroy(
        &resource(&fake),
        &mut diags,
        prior(),
        Default::default(),
        Default::default(),
    )
    .await;

    assert!(destroyed.is_none());
    assert_eq!(diags.errors.len(), 1);
    assert_eq!(diags.errors[0].summary, "Failed to delete drive");
}

#[tokio::test]
async fn import_then_read_fills_state() {
    let fake = FakeTransport::new();
    fake.on(Method::Get, PATH, 200, drive(Some(12)));

    let mut diags = Diagnostics::default();
    let (imported, private) = Resource::import(&resource(&fake), &mut diags, "30".to_owned())
        .await
        .unwrap();
    let (read, _) = Resource::read(
        &resource(&fake),
        &mut diags,
        imported,
        private,
        Default::default(),
    )
    .await
    .unwrap();

    assert!(diags.errors.is_empty());
    assert_eq!(read.label, ValueString::from("data"));
    assert_eq!(read.server_instance_group_id, ValueString::from("12"));
    assert_eq!(read.size_mbytes, Value::Value(40960));
}

#[tokio::test]
async fn rename_plans_unknown_status() {
    let fake = FakeTransport::new();
    let proposed = DriveState {
        label: ValueString::from("scratch"),
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
