use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::{Direction, Transaction, UNCATEGORIZED};
use tally_rules::{CategoryStore, StoreError, categorize};

fn record(details: &str, amount: i64, direction: Direction) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        details,
        Decimal::new(amount, 0),
        direction,
    )
    .unwrap()
}

/// Session 1 builds rules and saves; session 2 loads them and gets the same answers.
#[test]
fn test_rules_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");

    let mut store = CategoryStore::load(&path);
    assert_eq!(store, CategoryStore::new());

    store.add_category("Shopping").add_category("Streaming");
    store.add_keyword("Shopping", "amazon").unwrap();
    store.add_keyword("Streaming", "netflix").unwrap();
    store.add_keyword("Streaming", " Disney+ ").unwrap();
    store.save(&path).unwrap();

    let reloaded = CategoryStore::load(&path);
    assert_eq!(reloaded, store);
    assert_eq!(
        reloaded.categories().collect::<Vec<_>>(),
        vec![UNCATEGORIZED, "Shopping", "Streaming"]
    );
    assert_eq!(reloaded.lookup("Streaming").unwrap(), &["NETFLIX", "DISNEY+"]);

    let records = vec![
        record("AMAZON PRIME NETFLIX BUNDLE", 12, Direction::Debit),
        record("disney+ monthly", 8, Direction::Debit),
        record("SALARY", 5000, Direction::Credit),
    ];
    let cats: Vec<_> = categorize(&records, &reloaded)
        .iter()
        .map(|t| t.category().to_string())
        .collect();
    assert_eq!(cats, vec!["Shopping", "Streaming", UNCATEGORIZED]);
}

#[test]
fn test_save_overwrites_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");

    CategoryStore::starter().save(&path).unwrap();
    CategoryStore::new().save(&path).unwrap();

    assert_eq!(CategoryStore::load(&path), CategoryStore::new());
    assert!(!dir.path().join("categories.json.tmp").exists());
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("categories.json");
    CategoryStore::starter().save(&path).unwrap();
    assert_eq!(CategoryStore::load(&path), CategoryStore::starter());
}

#[test]
fn test_malformed_document_is_cold_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(CategoryStore::load(&path), CategoryStore::new());
}

#[test]
fn test_unwritable_target_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory sits where the document should go, so the rename fails.
    let path = dir.path().join("categories.json");
    std::fs::create_dir(&path).unwrap();

    let mut store = CategoryStore::new();
    store.add_category("Rent");
    let err = store.save(&path).unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    assert!(!dir.path().join("categories.json.tmp").exists());

    // In-memory state stays usable for the rest of the session.
    assert!(store.contains("Rent"));
    assert!(store.add_keyword("Rent", "landlord").unwrap());
}

#[test]
fn test_document_format_is_plain_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("categories.json");

    let mut store = CategoryStore::new();
    store.add_category("Streaming");
    store.add_keyword("Streaming", "netflix").unwrap();
    store.save(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["Streaming"], serde_json::json!(["NETFLIX"]));
    assert_eq!(value[UNCATEGORIZED], serde_json::json!([]));
}
