//! Sample database walkthrough

use crate::common::*;

#[test]
fn list_tables_is_sorted() {
    let db = TestDb::sample();
    assert_eq!(
        db.browser.list_tables().unwrap(),
        vec!["logs", "products", "users"]
    );
    db.assert_idle();
}

#[test]
fn inspect_users() {
    let db = TestDb::sample();
    let info = db.browser.table_info("users").unwrap();
    assert!(info.exists);
    assert_eq!(info.record_count, RecordCount::Complete(3));
    assert!(info.config.is_some());
    assert_eq!(info.error(), None);
}

#[test]
fn inspect_missing() {
    let db = TestDb::sample();
    let info = db.browser.table_info("missing").unwrap();
    assert!(!info.exists);
    assert_eq!(info.record_count, RecordCount::Complete(0));
    assert_eq!(info.config, None);
}

#[test]
fn export_users_to_json() {
    let db = TestDb::sample();
    let out = db.out("users.json");

    let count = db.browser.export_json("users", &out, None).unwrap();
    assert_eq!(count, 3);

    let doc = read_json(&out);
    assert_eq!(doc["table"], "users");
    assert_eq!(doc["record_count"], 3);
    let records = doc["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    let keys: Vec<&str> = records.iter().map(|r| r["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["1", "2", "3"]);
    assert_eq!(records[2]["value"], r#"{"name": "Charlie", "age": 35}"#);
    db.assert_idle();
}

#[test]
fn export_logs_to_csv_with_limit() {
    let db = TestDb::sample();
    let out = db.out("logs.csv");

    assert_eq!(db.browser.export_csv("logs", &out, Some(5)).unwrap(), 5);

    let lines = read_csv_lines(&out);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "key,value");
    assert_eq!(lines[5], "5,log entry 5");
    db.assert_idle();
}

#[test]
fn export_all_csv_writes_one_file_per_table() {
    let db = TestDb::sample();
    let out_dir = db.dir.path().join("all");

    let report = db
        .browser
        .export_all(&out_dir, ExportFormat::Csv, None)
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(report.exported.len(), 3);

    let mut files: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["logs.csv", "products.csv", "users.csv"]);

    for file in &files {
        let lines = read_csv_lines(&out_dir.join(file));
        assert_eq!(lines[0], "key,value");
    }
    db.assert_idle();
}

#[test]
fn full_exports_match_inspected_counts() {
    let db = TestDb::sample();
    for table in db.browser.list_tables().unwrap() {
        let n = db.browser.table_info(&table).unwrap().record_count.counted();

        let json = db.out(&format!("{}.json", table));
        assert_eq!(db.browser.export_json(&table, &json, None).unwrap(), n);
        assert_eq!(read_json(&json)["record_count"], n);

        let csv = db.out(&format!("{}.csv", table));
        assert_eq!(db.browser.export_csv(&table, &csv, None).unwrap(), n);
        assert_eq!(read_csv_lines(&csv).len() as u64, n + 1);
    }
}

#[test]
fn stream_yields_records_in_key_order() {
    let db = TestDb::sample();
    let keys: Vec<Value> = db
        .browser
        .stream("products", None)
        .unwrap()
        .map(|r| r.unwrap().key)
        .collect();
    assert_eq!(
        keys,
        vec![
            Value::from("prod-001"),
            Value::from("prod-002"),
            Value::from("prod-003"),
            Value::from("prod-004"),
        ]
    );
}
