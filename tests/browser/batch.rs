//! Batch export isolation and reporting

use crate::common::*;

#[test]
fn one_bad_table_does_not_stop_the_batch() {
    let db = TestDb::sample();
    corrupt_record(&db.home, "products", 0).unwrap();
    let out_dir = db.dir.path().join("all");

    let report = db
        .browser
        .export_all(&out_dir, ExportFormat::Json, None)
        .unwrap();

    let exported: Vec<&str> = report.exported.iter().map(|s| s.table.as_str()).collect();
    assert_eq!(exported, vec!["logs", "users"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].table, "products");
    assert_eq!(report.failed[0].label(), "failed");
    assert!(report.failed[0].error.is_scan());

    assert!(out_dir.join("logs.json").exists());
    assert!(out_dir.join("users.json").exists());
    assert!(!out_dir.join("products.json").exists());
    db.assert_idle();
}

#[test]
fn table_without_data_file_fails_alone() {
    let db = TestDb::sample();
    std::fs::remove_file(db.home.join("users.wt")).unwrap();

    let report = db
        .browser
        .export_all(&db.dir.path().join("all"), ExportFormat::Csv, None)
        .unwrap();
    assert_eq!(report.exported.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].table, "users");
}

#[test]
fn limit_applies_per_table() {
    let db = TestDb::sample();
    let report = db
        .browser
        .export_all(&db.dir.path().join("all"), ExportFormat::Csv, Some(2))
        .unwrap();

    let counts: Vec<(String, u64)> = report
        .exported
        .iter()
        .map(|s| (s.table.clone(), s.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("logs".to_string(), 2),
            ("products".to_string(), 2),
            ("users".to_string(), 2),
        ]
    );
}

#[test]
fn summaries_point_at_written_files() {
    let db = TestDb::sample();
    let out_dir = db.dir.path().join("nested/out");
    let report = db
        .browser
        .export_all(&out_dir, ExportFormat::Json, None)
        .unwrap();

    for summary in &report.exported {
        assert_eq!(summary.path, out_dir.join(format!("{}.json", summary.table)));
        assert_eq!(read_json(&summary.path)["record_count"], summary.count);
    }
}

#[test]
fn empty_catalog_gives_empty_report() {
    let db = TestDb::with(|b| b);
    let report = db
        .browser
        .export_all(&db.dir.path().join("all"), ExportFormat::Json, None)
        .unwrap();
    assert_eq!(report.total(), 0);
    assert!(report.is_clean());
}

#[test]
fn closed_browser_fails_whole_batch() {
    let mut db = TestDb::sample();
    db.browser.close().unwrap();
    let err = db
        .browser
        .export_all(&db.dir.path().join("all"), ExportFormat::Json, None)
        .unwrap_err();
    assert!(matches!(err, BrowseError::NotConnected));
}

#[test]
fn table_names_cannot_escape_output_dir() {
    let db = TestDb::with(|b| {
        b.table("users", "i", "S")
            .insert("users", 1, "alice")
            .table("../escaped", "i", "S")
            .insert("../escaped", 1, "x")
    });
    let out_dir = db.dir.path().join("out");

    let report = db
        .browser
        .export_all(&out_dir, ExportFormat::Json, None)
        .unwrap();

    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].table, "users");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].table, "../escaped");
    assert_eq!(report.failed[0].label(), "failed");
    assert!(matches!(
        report.failed[0].error,
        BrowseError::UnsafeTableName(_)
    ));

    assert!(!db.dir.path().join("escaped.json").exists());
    assert!(!db.dir.path().join("escaped.json.tmp").exists());
    db.assert_idle();
}
