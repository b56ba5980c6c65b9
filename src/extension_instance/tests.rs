use serde_json::json;
use tf_provider::value::{Value, ValueMap, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::fake::FakeTransport;
use crate::client::{ClientHandle, Method};

use super::*;

const CREATE_PATH: &str = "/api/v2/infrastructures/5/extension-instances";
const PATH: &str = "/api/v2/extension-instances/50";

fn instance(outputs: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 50,
        "revision": 2,
        "infrastructureId": 5,
        "extensionId": 4,
        "label": "k8s",
        "inputVariables": {"nodes": "3"},
        "outputVariables": outputs,
        "serviceStatus": "ordered",
    })
}

fn inputs<'a>(nodes: &str) -> ValueMap<'a, ValueString<'a>> {
    Value::Value([("nodes".into(), ValueString::from(nodes.to_owned()))].into())
}

fn prior<'a>() -> ExtensionInstanceState<'a> {
    ExtensionInstanceState {
        id: ValueString::from("50"),
        infrastructure_id: ValueString::from("5"),
        extension_id: ValueString::from("4"),
        label: ValueString::from("k8s"),
        input_variables: inputs("3"),
        output_variables: Value::Value(Default::default()),
        service_status: ValueString::from("ordered"),
    }
}

fn resource(fake: &FakeTransport) -> ExtensionInstanceResource {
    ExtensionInstanceResource::new(ClientHandle::new(fake.client()))
}

#[tokio::test]
async fn create_sends_inputs() {
    let fake = FakeTransport::new();
    fake.on(Method::Post, CREATE_PATH, 201, instance(json!(null)));

    let planned = ExtensionInstanceState {
        id: Value::Unknown,
        label: Value::Unknown,
        output_variables: Value::Unknown,
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
    assert_eq!(created.id, ValueString::from("50"));
    assert_eq!(created.output_variables, Value::Value(Default::default()));
    assert_eq!(
        fake.sent(Method::Post)[0].body,
        Some(json!({"extensionId": 4, "inputVariables": {"nodes": "3"}}))
    );
}

#[tokio::test]
async fn read_exposes_outputs() {
    let fake = FakeTransport::new();
    fake.on(
        Method::Get,
        PATH,
        200,
        instance(json!({"kubeconfig": "apiVersion: v1"})),
    );

    let mut diags = Diagnostics::default();
    let (read, _) = Resource::read(
        &resource(&fake),
        &mut diags,
        prior(),
        Default::default(),
        Default::default(),
    )
    .await
    .unwrap();

    assert!(diags.errors.is_empty());
    let outputs = read.output_variables.as_ref_option().unwrap();
    assert_eq!(
        outputs.get("kubeconfig"),
        Some(&ValueString::from("apiVersion: v1"))
    );
}

#[tokio::test]
async fn changing_inputs_recomputes_outputs() {
    let fake = FakeTransport::new();
    let proposed = ExtensionInstanceState {
        input_variables: inputs("5"),
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
    assert!(planned.output_variables.is_unknown());
}

#[tokio::test]
async fn changing_extension_forces_replacement() {
    let fake = FakeTransport::new();
    let proposed = ExtensionInstanceState {
        extension_id: ValueString::from("6"),
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

    assert_eq!(replace, vec![AttributePath::new("extension_id")]);
}

#[tokio::test]
async fn update_sends_revision() {
    let fake = FakeTransport::new();
    fake.on(Method::Get, PATH, 200, instance(json!({})))
        .on(Method::Patch, PATH, 200, instance(json!({})));

    let mut diags = Diagnostics::default();
    Resource::update(
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

    assert!(diags.errors.is_empty());
    assert_eq!(fake.sent(Method::Patch)[0].if_match, Some(2));
}

#[tokio::test]
async fn invalid_extension_id_is_rejected() {
    let fake = FakeTransport::new();
    let config = ExtensionInstanceState {
        extension_id: ValueString::from("kubernetes"),
        ..prior()
    };

    let mut diags = Diagnostics::default();
    assert!(Resource::validate(&resource(&fake), &mut diags, config).await.is_none());
    assert_eq!(diags.errors[0].attribute, AttributePath::new("extension_id"));
}

#[tokio::test]
async fn rename_plans_unknown_computed() {
    let fake = FakeTransport::new();
    let proposed = ExtensionInstanceState {
        label: ValueString::from("k8s-prod"),
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
    assert!(planned.output_variables.is_unknown());
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
