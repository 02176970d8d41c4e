use scriptorium_core::model::project::ActionHistory;
use scriptorium_core::model::workflow::View;
use scriptorium_core::{
    tracking_date_comparator, Entity, EntityQuery, EntityStore, ParseWarning, Tag, TypeRegistry,
};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn store_at(path: &Path) -> EntityStore {
    EntityStore::with_repository(path, TypeRegistry::standard(), Tag::ALL)
        .expect("store should construct")
}

fn view_line(model: &str) -> String {
    format!("workflow_view_v1\t{{\"model\":\"{model}\"}}")
}

fn view(model: &str) -> Entity {
    View::new(model).into()
}

#[test]
fn missing_repository_reads_as_empty() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_at(&dir.path().join("never-written.repository"));

    let read = store.entities(&EntityQuery::new(), None).expect("read");
    assert!(read.is_empty());
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("commented.repository");
    let content = format!(
        "# repository header\n\n{}\n   \n  # indented note\n{}\n",
        view_line("v1"),
        view_line("v2")
    );
    fs::write(&path, content).expect("write fixture");

    let store = store_at(&path);
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let read = store
        .entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(read, vec![view("v1"), view("v2")]);
    assert!(warnings.is_empty());
}

#[test]
fn malformed_line_warns_with_its_one_based_number() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("malformed.repository");
    let content = format!(
        "{}\n{}\nthis line has no separator\n{}\n",
        view_line("v1"),
        view_line("v2"),
        view_line("v3")
    );
    fs::write(&path, content).expect("write fixture");

    let store = store_at(&path);
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let read = store
        .entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(read, vec![view("v1"), view("v2"), view("v3")]);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, Some(3));
    assert!(warnings[0].message.contains("missing tag separator"));
}

#[test]
fn unknown_tag_warns_and_scan_continues() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("unknown-tag.repository");
    let content = format!("made_up_v9\t{{}}\n{}\n", view_line("kept"));
    fs::write(&path, content).expect("write fixture");

    let store = store_at(&path);
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let read = store
        .entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(read, vec![view("kept")]);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, Some(1));
    assert!(warnings[0].message.contains("unknown entity tag"));
}

#[test]
fn recognized_but_unsupported_tag_warns_instead_of_failing() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("subset.repository");
    let content = format!(
        "project_action_history_v1\t{{\"label\":\"hidden\"}}\n{}\n",
        view_line("kept")
    );
    fs::write(&path, content).expect("write fixture");

    let store =
        EntityStore::with_repository(&path, TypeRegistry::standard(), [Tag::WorkflowViewV1])
            .expect("store");
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let read = store
        .entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(read, vec![view("kept")]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0]
        .message
        .contains("not supported by this store instance"));
}

#[test]
fn undecodable_payload_warns_and_is_skipped() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("bad-payload.repository");
    let content = format!("workflow_view_v1\tnot json at all\n{}\n", view_line("kept"));
    fs::write(&path, content).expect("write fixture");

    let store = store_at(&path);
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let read = store
        .entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(read, vec![view("kept")]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("could not decode"));
}

#[test]
fn warnings_without_a_sink_are_dropped_silently() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("silent.repository");
    fs::write(&path, format!("garbage\n{}\n", view_line("kept"))).expect("write fixture");

    let store = store_at(&path);
    let read = store.entities(&EntityQuery::new(), None).expect("read");
    assert_eq!(read, vec![view("kept")]);
}

#[test]
fn max_count_cuts_off_in_read_order() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("capped.repository");
    let store = store_at(&path);
    store
        .persist(&[view("v1"), view("v2"), view("v3"), view("v4"), view("v5")])
        .expect("persist");

    let query = EntityQuery::new().max_count(2);
    let read = store.entities(&query, None).expect("read");
    assert_eq!(read, vec![view("v1"), view("v2")]);
}

#[test]
fn filter_sees_the_running_accepted_count() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("counted.repository");
    let store = store_at(&path);
    store
        .persist(&[view("v1"), view("v2"), view("v3")])
        .expect("persist");

    let seen = RefCell::new(Vec::new());
    let filter = |count: usize, _tag: Tag, _entity: &Entity| {
        seen.borrow_mut().push(count);
        count != 1
    };
    let query = EntityQuery::new().filter(&filter);
    let read = store.entities(&query, None).expect("read");

    // v1 accepted at count 0; v2 rejected at count 1; v3 still sees
    // count 1 (rejections do not advance it) and is rejected too.
    assert_eq!(read, vec![view("v1")]);
    assert_eq!(seen.into_inner(), vec![0, 1, 1]);
}

#[test]
fn filter_interacts_with_the_cutoff() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("filtered.repository");
    let store = store_at(&path);
    store
        .persist(&[
            view("v1"),
            view("v2"),
            view("v3"),
            view("v4"),
            view("v5"),
            view("v6"),
        ])
        .expect("persist");

    // Accept only even-numbered records; the cutoff counts accepted ones.
    let filter = |_count: usize, _tag: Tag, entity: &Entity| match entity {
        Entity::WorkflowView(inner) => inner
            .model
            .as_deref()
            .and_then(|model| model.trim_start_matches('v').parse::<u32>().ok())
            .map(|number| number % 2 == 0)
            .unwrap_or(false),
        _ => false,
    };
    let query = EntityQuery::new().max_count(2).filter(&filter);
    let read = store.entities(&query, None).expect("read");

    assert_eq!(read, vec![view("v2"), view("v4")]);
}

#[test]
fn sort_reorders_only_the_capped_result_set() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sorted.repository");
    let store = store_at(&path);

    let mut batch = Vec::new();
    for (label, date) in [("a", 300), ("b", 100), ("c", 200), ("d", 50)] {
        let mut action = ActionHistory::new(label, "", "");
        action.history.tracking =
            scriptorium_core::model::base::Tracking::stamped(date, "scribe");
        batch.push(Entity::from(action));
    }
    store.persist(&batch).expect("persist");

    // The cutoff keeps the first three in read order; the sort then
    // reorders those and cannot recover the dropped record.
    let comparator = tracking_date_comparator(true);
    let query = EntityQuery::new().max_count(3).comparator(&comparator);
    let read = store.entities(&query, None).expect("read");

    let dates: Vec<Option<i64>> = read
        .iter()
        .map(|entity| entity.tracking().and_then(|tracking| tracking.date))
        .collect();
    assert_eq!(dates, vec![Some(100), Some(200), Some(300)]);
}

#[test]
fn sort_is_stable_for_equal_dates() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("stable.repository");
    let store = store_at(&path);

    let mut batch = Vec::new();
    for label in ["first", "second", "third"] {
        let mut action = ActionHistory::new(label, "", "");
        action.history.tracking =
            scriptorium_core::model::base::Tracking::stamped(1_000, "scribe");
        batch.push(Entity::from(action));
    }
    store.persist(&batch).expect("persist");

    let comparator = tracking_date_comparator(true);
    let query = EntityQuery::new().comparator(&comparator);
    let read = store.entities(&query, None).expect("read");

    let labels: Vec<&str> = read
        .iter()
        .filter_map(|entity| match entity {
            Entity::ActionHistory(action) => action.label.as_deref(),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["first", "second", "third"]);
}

#[test]
fn entity_returns_the_first_accepted_record() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("first.repository");
    let store = store_at(&path);
    store
        .persist(&[view("v1"), view("v2")])
        .expect("persist");

    let first = store
        .entity(&EntityQuery::new(), None)
        .expect("read")
        .expect("one entity");
    assert_eq!(first, view("v1"));

    let empty_store = store_at(&dir.path().join("void.repository"));
    assert_eq!(empty_store.entity(&EntityQuery::new(), None).expect("read"), None);
}

#[test]
fn typed_read_narrows_and_warns_on_mismatches() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("narrowed.repository");
    let store = store_at(&path);
    store
        .persist(&[
            view("kept-1"),
            ActionHistory::new("skipped", "", "").into(),
            view("kept-2"),
        ])
        .expect("persist");

    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let views: Vec<View> = store
        .typed_entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(views, vec![View::new("kept-1"), View::new("kept-2")]);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, None);
    assert!(warnings[0].message.contains("does not narrow"));
}

#[test]
fn any_line_terminator_is_tolerated() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("terminators.repository");
    let content = format!("{}\r\n{}\n{}", view_line("v1"), view_line("v2"), view_line("v3"));
    fs::write(&path, content).expect("write fixture");

    let store = store_at(&path);
    let read = store.entities(&EntityQuery::new(), None).expect("read");
    assert_eq!(read, vec![view("v1"), view("v2"), view("v3")]);
}

#[test]
fn payload_tabs_survive_the_first_tab_split() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("tabbed.repository");
    // Tabs inside the payload (here as JSON inter-token whitespace) must
    // not be taken for the tag separator.
    fs::write(&path, "workflow_view_v1\t{\t\"model\":\t\"tabbed\"\t}\n").expect("write fixture");

    let store = store_at(&path);
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut sink = |warning: &ParseWarning| warnings.push(warning.clone());
    let read = store
        .entities(&EntityQuery::new(), Some(&mut sink))
        .expect("read");

    assert_eq!(read, vec![view("tabbed")]);
    assert!(warnings.is_empty());
}
