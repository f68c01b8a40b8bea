use favmarks::domain::errors::StoreError;
use favmarks::domain::lookup;
use favmarks::domain::models::{Bookmark, BookmarkKey, BookmarkScope};
use favmarks::storage::bookmarks::GlobalBookmarkStore;

#[test]
fn effective_label_uses_description_or_line() {
    let mut bookmark = Bookmark::new("/a.rs", 7, None);
    assert_eq!(bookmark.effective_label(), "Line 7");

    bookmark.description = Some("init".to_string());
    assert_eq!(bookmark.effective_label(), "init");

    bookmark.description = Some(String::new());
    assert_eq!(bookmark.effective_label(), "Line 7");
}

#[test]
fn empty_description_is_not_stored() {
    let bookmark = Bookmark::new("/a.rs", 2, Some(String::new()));
    assert_eq!(bookmark.description, None);
}

#[test]
fn bookmark_serializes_with_camel_case_fields() {
    let bookmark = Bookmark {
        file_path: "/a.rs".to_string(),
        line: 4,
        description: None,
        timestamp: 1_700_000_000_000,
    };
    let value = serde_json::to_value(&bookmark).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({"filePath": "/a.rs", "line": 4, "timestamp": 1_700_000_000_000i64})
    );
}

#[test]
fn add_creates_key_and_stamps_time() {
    let mut store = GlobalBookmarkStore::default();
    let added = store
        .add_bookmark("/a.rs", 10, Some("entry".to_string()))
        .expect("add");
    assert!(added.timestamp > 0);
    assert_eq!(store.for_file("/a.rs").len(), 1);
    assert_eq!(store.file_count(), 1);
}

#[test]
fn add_rejects_line_zero() {
    let mut store = GlobalBookmarkStore::default();
    assert_eq!(
        store.add_bookmark("/a.rs", 0, None),
        Err(StoreError::InvalidLine(0))
    );
    assert!(store.is_empty());
}

#[test]
fn removing_last_bookmark_prunes_the_key() {
    let mut store = GlobalBookmarkStore::default();
    store.add_bookmark("/a.rs", 1, None).expect("add");
    store.add_bookmark("/a.rs", 2, None).expect("add");

    assert!(store.remove_bookmark("/a.rs", "Line 1").is_some());
    assert_eq!(store.file_count(), 1);
    assert!(store.remove_bookmark("/a.rs", "Line 2").is_some());
    assert_eq!(store.file_count(), 0);
    assert!(store.files().next().is_none());
}

#[test]
fn remove_unknown_label_is_a_no_op() {
    let mut store = GlobalBookmarkStore::default();
    store.add_bookmark("/a.rs", 1, None).expect("add");
    assert!(store.remove_bookmark("/a.rs", "Line 2").is_none());
    assert!(store.remove_bookmark("/b.rs", "Line 1").is_none());
    assert_eq!(store.bookmark_count(), 1);
}

#[test]
fn rename_changes_the_lookup_label() {
    let mut store = GlobalBookmarkStore::default();
    store.add_bookmark("/a.rs", 5, None).expect("add");

    assert!(store.rename_bookmark("/a.rs", "Line 5", "parser entry"));
    assert!(!store.rename_bookmark("/a.rs", "Line 5", "other"));
    assert!(store.remove_bookmark("/a.rs", "parser entry").is_some());
}

#[test]
fn clear_file_and_clear_all() {
    let mut store = GlobalBookmarkStore::default();
    store.add_bookmark("/a.rs", 1, None).expect("add");
    store.add_bookmark("/a.rs", 2, None).expect("add");
    store.add_bookmark("/b.rs", 3, None).expect("add");

    assert_eq!(store.clear_file("/a.rs"), 2);
    assert_eq!(store.clear_file("/a.rs"), 0);
    assert_eq!(store.clear_all(), 1);
    assert!(store.is_empty());
}

#[test]
fn duplicate_labels_resolve_to_first_match() {
    let mut store = GlobalBookmarkStore::default();
    store
        .add_bookmark("/a.rs", 1, Some("same".to_string()))
        .expect("add");
    store
        .add_bookmark("/a.rs", 2, Some("same".to_string()))
        .expect("add");

    assert_eq!(lookup::count_by_label(store.for_file("/a.rs"), "same"), 2);
    let removed = store.remove_bookmark("/a.rs", "same").expect("removed");
    assert_eq!(removed.line, 1);
    assert_eq!(store.for_file("/a.rs")[0].line, 2);
}

#[test]
fn bookmark_key_is_derived_from_scope_file_and_label() {
    let bookmark = Bookmark::new("/a.rs", 12, None);
    let key = BookmarkKey::of(BookmarkScope::Group("Work".to_string()), &bookmark);
    assert_eq!(key, BookmarkKey::in_group("Work", "/a.rs", "Line 12"));
    assert_ne!(key, BookmarkKey::global("/a.rs", "Line 12"));
}

#[test]
fn imported_records_are_addressed_by_their_key() {
    let mut store: GlobalBookmarkStore = serde_json::from_value(serde_json::json!({
        "/w/a.ts": [
            {"filePath": "a.ts", "line": 3, "timestamp": 0},
            {"filePath": "a.ts", "line": 9, "timestamp": 0}
        ]
    }))
    .expect("deserialize store");

    assert!(store.rename_bookmark("/w/a.ts", "Line 9", "tail"));
    assert_eq!(store.for_file("/w/a.ts")[1].effective_label(), "tail");

    let removed = store.remove_bookmark("/w/a.ts", "Line 3").expect("removed");
    assert_eq!(removed.line, 3);
    assert!(store.remove_bookmark("/w/a.ts", "tail").is_some());
    assert!(store.is_empty());
}

#[test]
fn group_lookup_still_distinguishes_files() {
    let bookmarks = vec![
        Bookmark::new("/a.rs", 4, None),
        Bookmark::new("/b.rs", 4, None),
    ];
    assert_eq!(lookup::find_position(&bookmarks, "/b.rs", "Line 4"), Some(1));
    assert_eq!(lookup::match_count(&bookmarks, "/a.rs", "Line 4"), 1);
    assert_eq!(lookup::count_by_label(&bookmarks, "Line 4"), 2);
}
