// Sort merging and cell styling through the public API

use column_state::api::notifier::{Notifier, RecordingNotifier};
use column_state::column_ops::update_sort;
use column_state::data::{
    Column, ColumnSet, ColumnType, SortDirection, SortEntry, SortOrder, SortSpec,
};
use column_state::state::ViewerSession;
use column_state::styling::{build_styling, StyleOptions};
use serde_json::json;
use std::sync::Arc;

fn selection(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn existing_sort() -> SortSpec {
    SortSpec::from_entries(vec![
        SortEntry::new("a", SortDirection::Asc),
        SortEntry::new("b", SortDirection::Desc),
    ])
}

#[test]
fn test_ascending_moves_selection_to_lowest_priority() {
    let t = update_sort(&selection(&["a"]), SortOrder::Ascending, &existing_sort());
    let sort = t.change.sort_info.unwrap();

    assert_eq!(
        sort.entries(),
        &[
            SortEntry::new("b", SortDirection::Desc),
            SortEntry::new("a", SortDirection::Asc),
        ]
    );
    assert_eq!(sort.to_string(), "b DESC, a ASC");
    assert!(t.notification.is_none());
}

#[test]
fn test_none_removes_selection() {
    let t = update_sort(&selection(&["a"]), SortOrder::None, &existing_sort());
    let sort = t.change.sort_info.unwrap();

    assert_eq!(sort.entries(), &[SortEntry::new("b", SortDirection::Desc)]);
    assert!(t.change.trigger_resize);
}

#[test]
fn test_none_on_unsorted_column_keeps_sort() {
    let t = update_sort(&selection(&["c"]), SortOrder::None, &existing_sort());

    assert_eq!(t.change.sort_info, Some(existing_sort()));
    assert!(t.notification.is_none());
}

#[test]
fn test_sort_selection_keeps_selection_order() {
    let t = update_sort(
        &selection(&["c", "a"]),
        SortOrder::Descending,
        &existing_sort(),
    );
    let sort = t.change.sort_info.unwrap();
    assert_eq!(sort.to_string(), "b DESC, c DESC, a DESC");
}

#[test]
fn test_sort_commit_updates_session_without_backend() {
    let columns = ColumnSet::new(vec![Column::new("a"), Column::new("b")]).unwrap();
    let mut session = ViewerSession::new("1", columns).with_sort(existing_sort());
    let recorder = Arc::new(RecordingNotifier::new());
    let notifier: Arc<dyn Notifier> = recorder.clone();

    update_sort(&selection(&["b"]), SortOrder::None, &session.sort_info)
        .commit(&mut session, &notifier);

    assert_eq!(session.sort_info.direction_of("a"), Some(SortDirection::Asc));
    assert_eq!(session.sort_info.direction_of("b"), None);
    assert!(session.take_resize());
    assert_eq!(recorder.count(), 0);
}

#[test]
fn test_sort_spec_json_shape() {
    let json = serde_json::to_value(existing_sort()).unwrap();
    assert_eq!(json, json!([["a", "ASC"], ["b", "DESC"]]));

    let parsed: SortSpec = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, existing_sort());
}

#[test]
fn test_styling_cases() {
    let red_negs = StyleOptions { red_negs: true };

    let style = build_styling(Some(&json!(-3)), ColumnType::Int, Some(&red_negs));
    assert_eq!(style.color(), Some("red"));

    let style = build_styling(Some(&json!(3)), ColumnType::Int, Some(&red_negs));
    assert_eq!(style.color(), Some(""));

    let style = build_styling(Some(&json!(-3)), ColumnType::String, Some(&red_negs));
    assert!(style.is_empty());

    let style = build_styling(None, ColumnType::Int, Some(&red_negs));
    assert!(style.is_empty());

    let style = build_styling(Some(&json!(-3)), ColumnType::Int, None);
    assert!(style.is_empty());
}

#[test]
fn test_styling_uses_column_dtype() {
    let red_negs = StyleOptions { red_negs: true };
    let column = Column::new("price").with_dtype("float64");

    let style = build_styling(Some(&json!(-0.25)), column.column_type(), Some(&red_negs));
    assert_eq!(
        serde_json::to_value(&style).unwrap(),
        json!({"color": "red"})
    );
}
