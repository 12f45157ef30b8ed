use std::fs;

use hanyu_core::time::fixed_now;
use hanyu_core::{EntryUid, FileStatRecord, NodeId, Settings, VocabEntry};
use storage::{Database, JsonFileStore, KEY_SETTINGS, KEY_TREE, KeyValueStore, StoreError};

#[test]
fn file_backed_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let now = fixed_now();

    {
        let mut db = Database::open(dir.path());
        let mut tree = db.load_tree(now);
        let file_id = NodeId::new(77);
        tree.create_file(Some(NodeId::new(1)), "Bài 3 - Màu sắc", file_id, now)
            .unwrap();
        tree.attach_vocabulary(
            file_id,
            vec![
                VocabEntry::seeded(EntryUid::new(), "红"),
                VocabEntry::seeded(EntryUid::new(), "蓝"),
            ],
        )
        .unwrap();
        db.save_tree(&tree);

        let mut settings = db.load_settings();
        settings.dark_mode = true;
        settings.username = "Lan".to_owned();
        db.save_settings(&settings);

        let mut stats = db.load_stats();
        let mut record = FileStatRecord::default();
        record.record(7, 3, 10, now);
        stats.insert(file_id.to_string(), record);
        db.save_stats(&stats);
    }

    let db = Database::open(dir.path());
    let tree = db.load_tree(now);
    let file = tree.find(NodeId::new(77)).expect("file persisted");
    assert_eq!(file.name(), "Bài 3 - Màu sắc");
    assert_eq!(file.word_count(), 2);

    let settings = db.load_settings();
    assert!(settings.dark_mode);
    assert_eq!(settings.username, "Lan");

    let stats = db.load_stats();
    let record = stats.get("77").expect("stat record persisted");
    assert_eq!(record.sessions, 1);
    assert_eq!(record.best_percent, 70);
    assert_eq!(record.last_played, Some(now));
}

#[test]
fn corrupted_tree_file_falls_back_to_starter() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path()).unwrap();
    fs::write(dir.path().join(format!("{KEY_TREE}.json")), "[{broken").unwrap();

    let db = Database::open(dir.path());
    let tree = db.load_tree(fixed_now());
    assert_eq!(tree.files().len(), 3);
    assert_eq!(
        tree.find(NodeId::new(3)).unwrap().name(),
        "Bài 2 - Gia đình"
    );
}

#[test]
fn clear_all_deletes_the_record_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(dir.path());
    db.save_settings(&Settings::default());
    let tree = db.load_tree(fixed_now());
    db.save_tree(&tree);
    assert!(dir.path().join(format!("{KEY_SETTINGS}.json")).exists());

    db.clear_all();
    assert!(!dir.path().join(format!("{KEY_SETTINGS}.json")).exists());
    assert!(!dir.path().join(format!("{KEY_TREE}.json")).exists());
}

/// Store stub whose writes always fail, for the memory-authoritative
/// asymmetry: a failed flush must not disturb the caller.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("store is full")))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("store is full")))
    }
}

#[test]
fn failed_writes_degrade_to_memory_only() {
    let mut db = Database::with_store(Box::new(ReadOnlyStore));
    let mut tree = db.load_tree(fixed_now());
    tree.create_folder(None, "HSK 3", NodeId::new(9)).unwrap();

    // neither save nor clear surfaces the backend failure
    db.save_tree(&tree);
    db.clear_all();

    // the in-memory tree is untouched; reads still serve defaults
    assert!(tree.find(NodeId::new(9)).is_some());
    assert_eq!(db.load_tree(fixed_now()).files().len(), 3);
}

#[test]
fn raw_store_read_reports_missing_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path());
    assert!(store.read("absent").unwrap().is_none());
    store.write("present", "1").unwrap();
    assert_eq!(store.read("present").unwrap().as_deref(), Some("1"));
    store.remove("present").unwrap();
    store.remove("present").unwrap();
    assert!(store.read("present").unwrap().is_none());
}
