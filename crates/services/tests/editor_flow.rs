use hanyu_core::time::{fixed_clock, fixed_now};
use hanyu_core::{EntryUid, NodeId, RowKey, Tree, VocabEntry, VocabField};
use services::{App, AppError, DraftRow, EditorError};
use storage::Database;

/// Builds an app with one file containing the given terms, confirmed
/// through the normal draft flow.
fn app_with_terms(terms: &[&str]) -> (App, NodeId) {
    let mut app = App::load_with_clock(Database::in_memory(), fixed_clock());
    let file = app.create_file(None, "Bài kiểm tra").unwrap();
    app.open_file(file).unwrap();

    let starter_rows: Vec<u64> = app
        .editor()
        .unwrap()
        .draft_rows()
        .unwrap()
        .iter()
        .map(DraftRow::row_id)
        .collect();
    for (i, term) in terms.iter().enumerate() {
        let row = match starter_rows.get(i) {
            Some(&row) => row,
            None => app.add_draft_row(None).unwrap(),
        };
        app.set_draft_text(row, term).unwrap();
    }
    app.confirm_terms().unwrap();
    (app, file)
}

fn row_keys(app: &App, file: NodeId) -> Vec<RowKey> {
    app.tree()
        .find(file)
        .unwrap()
        .vocab()
        .unwrap()
        .iter()
        .map(VocabEntry::row_key)
        .collect()
}

#[test]
fn five_entries_delete_position_three_renumbers() {
    let (mut app, file) = app_with_terms(&["一", "二", "三", "四", "五"]);
    let keys = row_keys(&app, file);
    assert_eq!(keys.len(), 5);

    app.delete_entry(keys[2]).unwrap();

    let rows = app.tree().find(file).unwrap().vocab().unwrap();
    assert_eq!(rows.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(
        rows.iter().map(|e| e.from.as_str()).collect::<Vec<_>>(),
        vec!["一", "二", "四", "五"]
    );
}

#[test]
fn enrichment_survives_redrafting_unchanged_terms() {
    let (mut app, file) = app_with_terms(&["你好", "再见"]);
    let keys = row_keys(&app, file);
    app.edit_entry_field(keys[0], VocabField::Pinyin, "nǐ hǎo").unwrap();
    app.edit_entry_field(keys[0], VocabField::Meaning, "xin chào").unwrap();
    app.edit_entry_field(keys[0], VocabField::ExampleHanzi, "你好吗？").unwrap();
    app.edit_entry_field(keys[1], VocabField::Meaning, "tạm biệt").unwrap();

    // back to the term step: change the second term, add a third
    app.edit_terms().unwrap();
    let rows: Vec<u64> = app
        .editor()
        .unwrap()
        .draft_rows()
        .unwrap()
        .iter()
        .map(DraftRow::row_id)
        .collect();
    app.set_draft_text(rows[1], "明天见").unwrap();
    let added = app.add_draft_row(None).unwrap();
    app.set_draft_text(added, "谢谢").unwrap();
    assert_eq!(app.confirm_terms().unwrap(), 3);

    let entries = app.tree().find(file).unwrap().vocab().unwrap();
    // unchanged term kept every enriched field
    assert_eq!(entries[0].from, "你好");
    assert_eq!(entries[0].pinyin, "nǐ hǎo");
    assert_eq!(entries[0].meaning, "xin chào");
    assert_eq!(entries[0].ex_han, "你好吗？");
    // changed term kept its uid but lost the enrichment
    assert_eq!(entries[1].from, "明天见");
    assert_eq!(entries[1].uid, keys[1].uid());
    assert!(entries[1].meaning.is_empty());
    // fresh term is blank apart from the seeded text
    assert_eq!(entries[2].from, "谢谢");
    assert!(entries[2].pinyin.is_empty());
    assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn legacy_rows_are_addressed_by_position() {
    // a tree persisted before uids existed
    let mut db = Database::in_memory();
    let mut tree = Tree::starter(fixed_now());
    let legacy = |id: u32, from: &str, meaning: &str| VocabEntry {
        id,
        from: from.to_owned(),
        hanzi: from.to_owned(),
        meaning: meaning.to_owned(),
        ..VocabEntry::default()
    };
    tree.attach_vocabulary(
        NodeId::new(2),
        vec![legacy(1, "水", "nước"), legacy(2, "火", "lửa")],
    )
    .unwrap();
    db.save_tree(&tree);

    let mut app = App::load_with_clock(db, fixed_clock());
    app.open_file(NodeId::new(2)).unwrap();
    assert!(app.editor().unwrap().draft_rows().is_none());

    app.edit_entry_field(RowKey::Position(2), VocabField::Pinyin, "huǒ")
        .unwrap();
    let rows = app.tree().find(NodeId::new(2)).unwrap().vocab().unwrap();
    assert_eq!(rows[1].pinyin, "huǒ");

    app.delete_entry(RowKey::Position(1)).unwrap();
    let rows = app.tree().find(NodeId::new(2)).unwrap().vocab().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].from, "火");
    assert_eq!(rows[0].id, 1);
}

#[test]
fn last_draft_row_cannot_be_deleted() {
    let mut app = App::load_with_clock(Database::in_memory(), fixed_clock());
    let file = app.create_file(None, "Mới").unwrap();
    app.open_file(file).unwrap();

    let rows: Vec<u64> = app
        .editor()
        .unwrap()
        .draft_rows()
        .unwrap()
        .iter()
        .map(DraftRow::row_id)
        .collect();
    app.delete_draft_row(rows[0]).unwrap();
    app.delete_draft_row(rows[1]).unwrap();
    assert_eq!(
        app.delete_draft_row(rows[2]),
        Err(AppError::Editor(EditorError::LastRow))
    );
    assert_eq!(app.editor().unwrap().draft_rows().unwrap().len(), 1);
}

#[test]
fn confirmed_vocabulary_survives_reopening_the_app() {
    let dir = tempfile::tempdir().unwrap();

    let file = {
        let mut app = App::load_with_clock(Database::open(dir.path()), fixed_clock());
        let file = app.create_file(Some(NodeId::new(4)), "Bài 2 - Mua sắm").unwrap();
        app.open_file(file).unwrap();
        let row = app.editor().unwrap().draft_rows().unwrap()[0].row_id();
        app.set_draft_text(row, "多少钱").unwrap();
        app.confirm_terms().unwrap();
        let key = row_keys(&app, file)[0];
        app.edit_entry_field(key, VocabField::Meaning, "bao nhiêu tiền")
            .unwrap();
        file
    };

    let app = App::load_with_clock(Database::open(dir.path()), fixed_clock());
    let node = app.tree().find(file).expect("file persisted");
    assert_eq!(node.name(), "Bài 2 - Mua sắm");
    assert_eq!(node.vocab().unwrap()[0].meaning, "bao nhiêu tiền");
}

/// Helper for reading a row key's uid in assertions.
trait RowKeyExt {
    fn uid(&self) -> Option<EntryUid>;
}

impl RowKeyExt for RowKey {
    fn uid(&self) -> Option<EntryUid> {
        match self {
            RowKey::Uid(uid) => Some(*uid),
            RowKey::Position(_) => None,
        }
    }
}
