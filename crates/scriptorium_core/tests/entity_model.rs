use scriptorium_core::model::base::{Instance, Level, Tracking};
use scriptorium_core::model::job::{Process, ProcessAction, ProcessHistory, ProcessState};
use scriptorium_core::model::project::{Grant, Project, ProjectState, Right, Security};
use scriptorium_core::model::provider::ServiceProvider;
use scriptorium_core::model::sandbox::{Snapshot, SnapshotType};
use scriptorium_core::model::workflow::Metadata;
use scriptorium_core::FixedClock;
use serde_json::Value;

#[test]
fn tracking_fields_flatten_into_the_record_payload() {
    let mut project = Project::default();
    project.tracking = Tracking::stamped(1_700_000_000_000, "herbert");
    project.name = Some("codices".to_string());
    project.state = Some(ProjectState::Active);

    let value: Value = serde_json::to_value(&project).expect("encode");
    assert_eq!(value["date"], Value::from(1_700_000_000_000_i64));
    assert_eq!(value["user"], Value::from("herbert"));
    assert_eq!(value["name"], Value::from("codices"));
    assert_eq!(value["state"], Value::from("active"));
    assert!(value.get("tracking").is_none(), "tracking must not nest");
}

#[test]
fn absent_optional_fields_are_omitted_from_the_payload() {
    let project = Project::default();
    let value: Value = serde_json::to_value(&project).expect("encode");
    let object = value.as_object().expect("object payload");
    assert!(object.is_empty(), "empty project serializes to {{}}: {object:?}");
}

#[test]
fn unknown_payload_fields_are_ignored_on_decode() {
    let decoded: Project =
        serde_json::from_str("{\"name\":\"codices\",\"legacyField\":42}").expect("decode");
    assert_eq!(decoded.name.as_deref(), Some("codices"));
}

#[test]
fn process_uses_the_historical_kebab_case_stream_names() {
    let mut process = Process::new(&FixedClock(12_000), "operator");
    process.state = Some(ProcessState::Running);
    process.standard_output = Some("42 folios".to_string());
    process.standard_error = Some("1 skipped".to_string());

    let value: Value = serde_json::to_value(&process).expect("encode");
    assert_eq!(value["standard-output"], Value::from("42 folios"));
    assert_eq!(value["standard-error"], Value::from("1 skipped"));
    assert_eq!(value["state"], Value::from("running"));

    let decoded: Process = serde_json::from_value(value).expect("decode");
    assert_eq!(decoded, process);
}

#[test]
fn process_history_carries_instance_action_and_provider() {
    let mut entry = ProcessHistory::new(
        Level::Warn,
        Instance::new(2, "node-b"),
        ProcessAction::Interrupted,
    );
    entry.job = 11;
    entry.steps = 4;
    entry.step = 2;
    entry.set_progress(0.5);

    let value: Value = serde_json::to_value(&entry).expect("encode");
    assert_eq!(value["level"], Value::from("warn"));
    assert_eq!(value["action"], Value::from("interrupted"));
    assert_eq!(value["instance"]["id"], Value::from(2));

    let decoded: ProcessHistory = serde_json::from_value(value).expect("decode");
    assert_eq!(decoded, entry);
}

#[test]
fn snapshot_kind_serializes_under_the_type_key() {
    let snapshot = Snapshot::new(
        &FixedClock(500),
        SnapshotType::Layout,
        "region pass",
        "page segmentation",
        ServiceProvider::with_id("layout.engine"),
        Instance::new(1, "node-a"),
        "operator",
    );

    let value: Value = serde_json::to_value(&snapshot).expect("encode");
    assert_eq!(value["type"], Value::from("layout"));
    assert_eq!(value["service-provider"]["id"], Value::from("layout.engine"));
    assert_eq!(value["updated"], Value::from(500));

    let decoded: Snapshot = serde_json::from_value(value).expect("decode");
    assert_eq!(decoded, snapshot);
}

#[test]
fn security_grants_flatten_rights_next_to_targets() {
    let mut project = Project::default();
    project.security = Some(Security {
        users: Some(
            [Grant::new(
                Right {
                    read: true,
                    write: true,
                    ..Right::default()
                },
                ["herbert"],
            )]
            .into_iter()
            .collect(),
        ),
        groups: None,
        other: Some(Right {
            read: true,
            ..Right::default()
        }),
    });

    let value: Value = serde_json::to_value(&project).expect("encode");
    let grant = &value["security"]["users"][0];
    assert_eq!(grant["read"], Value::from(true));
    assert_eq!(grant["write"], Value::from(true));
    assert_eq!(grant["targets"][0], Value::from("herbert"));
    assert_eq!(value["security"]["other"]["read"], Value::from(true));

    let decoded: Project = serde_json::from_value(value).expect("decode");
    assert_eq!(decoded, project);
}

#[test]
fn workflow_metadata_keeps_its_historical_wire_names() {
    let mut metadata = Metadata::default();
    metadata.identifier.id = Some("wf-7".to_string());
    metadata.updated = Some(2_000);
    metadata.update_user = Some("reviewer".to_string());
    metadata.view_model = Some("{\"zoom\":1}".to_string());

    let value: Value = serde_json::to_value(&metadata).expect("encode");
    assert_eq!(value["id"], Value::from("wf-7"));
    assert_eq!(value["update-user"], Value::from("reviewer"));
    assert_eq!(value["view-model"], Value::from("{\"zoom\":1}"));

    let decoded: Metadata = serde_json::from_value(value).expect("decode");
    assert_eq!(decoded, metadata);
}
