use favmarks::domain::errors::StoreError;
use favmarks::domain::models::Bookmark;
use favmarks::storage::favorites::FavoritesStore;

fn store_with(group: &str, files: &[&str]) -> FavoritesStore {
    let mut store = FavoritesStore::default();
    store.create_group(group).expect("create group");
    for file in files {
        store.add_file(group, file).expect("add file");
    }
    store
}

fn files(store: &FavoritesStore, group: &str) -> Vec<String> {
    store.group(group).expect("group exists").files.clone()
}

#[test]
fn create_group_rejects_existing_name() {
    let mut store = FavoritesStore::default();
    store.create_group("Work").expect("first create");
    let err = store.create_group("Work").expect_err("duplicate create");
    assert_eq!(err, StoreError::GroupExists("Work".to_string()));
    assert_eq!(store.len(), 1);
}

#[test]
fn create_group_rejects_blank_name() {
    let mut store = FavoritesStore::default();
    assert_eq!(store.create_group("   "), Err(StoreError::InvalidGroupName));
    assert!(store.is_empty());
}

#[test]
fn adding_same_file_twice_keeps_one_entry() {
    let mut store = store_with("Work", &[]);
    assert!(store.add_file("Work", "/src/a.rs").expect("add"));
    assert!(!store.add_file("Work", "/src/a.rs").expect("add again"));
    assert!(!store.add_file("Work", "/src/a.rs").expect("add again"));
    assert_eq!(files(&store, "Work"), vec!["/src/a.rs"]);
}

#[test]
fn add_file_to_missing_group_fails_with_suggestion() {
    let mut store = store_with("Backend", &[]);
    let err = store
        .add_file("backnd", "/src/a.rs")
        .expect_err("missing group");
    match err {
        StoreError::GroupNotFound { name, suggestion } => {
            assert_eq!(name, "backnd");
            assert_eq!(suggestion.as_deref(), Some("Backend"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.group("backnd").is_none());
}

#[test]
fn add_file_creating_group_creates_when_absent() {
    let mut store = FavoritesStore::default();
    assert!(store
        .add_file_creating_group("New", "/a.rs")
        .expect("add with create"));
    assert_eq!(files(&store, "New"), vec!["/a.rs"]);
}

#[test]
fn rename_onto_existing_group_is_rejected_without_overwrite() {
    let mut store = store_with("X", &["/x.rs"]);
    store.create_group("Y").expect("create Y");
    store.add_file("Y", "/y.rs").expect("add to Y");

    let err = store.rename_group("X", "Y", false).expect_err("collision");
    assert_eq!(err, StoreError::GroupExists("Y".to_string()));
    assert_eq!(files(&store, "X"), vec!["/x.rs"]);
    assert_eq!(files(&store, "Y"), vec!["/y.rs"]);
}

#[test]
fn confirmed_rename_onto_existing_group_discards_target_contents() {
    let mut store = store_with("X", &["/x.rs"]);
    store.create_group("Y").expect("create Y");
    store.add_file("Y", "/y.rs").expect("add to Y");

    assert!(store.rename_group("X", "Y", true).expect("overwrite rename"));
    assert!(store.group("X").is_none());
    assert_eq!(files(&store, "Y"), vec!["/x.rs"]);
}

#[test]
fn rename_moves_files_and_bookmarks() {
    let mut store = store_with("Old", &["/a.rs"]);
    store
        .add_group_bookmark("Old", Bookmark::new("/a.rs", 3, None))
        .expect("bookmark");

    assert!(store.rename_group("Old", "New", false).expect("rename"));
    let group = store.group("New").expect("renamed group");
    assert_eq!(group.files, vec!["/a.rs"]);
    assert_eq!(group.bookmarks.len(), 1);
    assert!(store.group("Old").is_none());
}

#[test]
fn rename_to_same_name_is_a_no_op() {
    let mut store = store_with("Same", &["/a.rs"]);
    assert!(!store.rename_group("Same", "Same", false).expect("rename"));
    assert_eq!(files(&store, "Same"), vec!["/a.rs"]);
}

#[test]
fn rename_missing_group_fails() {
    let mut store = FavoritesStore::default();
    assert!(matches!(
        store.rename_group("Ghost", "Other", false),
        Err(StoreError::GroupNotFound { .. })
    ));
}

#[test]
fn delete_group_reports_whether_anything_was_removed() {
    let mut store = store_with("Work", &["/a.rs"]);
    assert!(store.delete_group("Work"));
    assert!(!store.delete_group("Work"));
    assert!(store.is_empty());
}

#[test]
fn remove_file_finds_owning_group() {
    let mut store = store_with("A", &["/1.rs", "/2.rs"]);
    store.create_group("B").expect("create B");
    store.add_file("B", "/3.rs").expect("add");

    assert_eq!(store.group_of("/3.rs"), Some("B"));
    assert_eq!(store.remove_file("/3.rs").as_deref(), Some("B"));
    assert!(files(&store, "B").is_empty());
    assert_eq!(store.remove_file("/nowhere.rs"), None);
    assert_eq!(files(&store, "A"), vec!["/1.rs", "/2.rs"]);
}

#[test]
fn reorder_moves_file_to_target_position() {
    let mut store = store_with("G", &["A", "B", "C", "D"]);
    assert!(store.reorder_file("G", "B", "D"));
    assert_eq!(files(&store, "G"), vec!["A", "C", "D", "B"]);

    assert!(store.reorder_file("G", "B", "A"));
    assert_eq!(files(&store, "G"), vec!["B", "A", "C", "D"]);
}

#[test]
fn reorder_no_ops() {
    let mut store = store_with("G", &["A", "B"]);
    store.create_group("H").expect("create H");
    store.add_file("H", "X").expect("add");

    assert!(!store.reorder_file("G", "B", "B"));
    assert!(!store.reorder_file("G", "A", "X"));
    assert!(!store.reorder_file("G", "missing", "A"));
    assert!(!store.reorder_file("nope", "A", "B"));
    assert_eq!(files(&store, "G"), vec!["A", "B"]);
    assert_eq!(files(&store, "H"), vec!["X"]);
}

#[test]
fn group_bookmark_lifecycle() {
    let mut store = FavoritesStore::default();
    store
        .add_group_bookmark("Auto", Bookmark::new("/a.rs", 7, None))
        .expect("creates group");
    store
        .add_group_bookmark("Auto", Bookmark::new("/a.rs", 9, Some("init".to_string())))
        .expect("second bookmark");
    assert_eq!(store.bookmark_count(), 2);

    assert!(store.rename_group_bookmark("Auto", "/a.rs", "Line 7", "setup"));
    assert!(!store.rename_group_bookmark("Auto", "/a.rs", "Line 7", "again"));

    let removed = store
        .remove_group_bookmark("Auto", "/a.rs", "init")
        .expect("removed");
    assert_eq!(removed.line, 9);
    assert!(store.remove_group_bookmark("Auto", "/b.rs", "setup").is_none());

    let labels: Vec<String> = store
        .group("Auto")
        .expect("group")
        .bookmarks
        .iter()
        .map(Bookmark::effective_label)
        .collect();
    assert_eq!(labels, vec!["setup"]);

    assert_eq!(store.clear_group_bookmarks("Auto").expect("clear"), 1);
    assert_eq!(store.bookmark_count(), 0);
    assert!(store.clear_group_bookmarks("Missing").is_err());
}

#[test]
fn group_bookmark_rejects_line_zero() {
    let mut store = FavoritesStore::default();
    let err = store
        .add_group_bookmark("G", Bookmark::new("/a.rs", 0, None))
        .expect_err("line zero");
    assert_eq!(err, StoreError::InvalidLine(0));
    assert!(store.is_empty());
}

#[test]
fn ambiguous_group_bookmarks_resolve_to_first() {
    let mut store = FavoritesStore::default();
    store
        .add_group_bookmark("G", Bookmark::new("/a.rs", 1, Some("todo".to_string())))
        .expect("first");
    store
        .add_group_bookmark("G", Bookmark::new("/a.rs", 2, Some("todo".to_string())))
        .expect("second");

    let removed = store
        .remove_group_bookmark("G", "/a.rs", "todo")
        .expect("removed");
    assert_eq!(removed.line, 1);
}
