//! Scan faults in inspection and export

use crate::common::*;

#[test]
fn inspect_reports_partial_count() {
    let db = TestDb::sample();
    corrupt_record(&db.home, "logs", 6).unwrap();

    let info = db.browser.table_info("logs").unwrap();
    assert!(info.exists);
    match &info.record_count {
        RecordCount::Partial { counted, cause } => {
            assert_eq!(*counted, 6);
            assert!(cause.contains("logs"));
        }
        other => panic!("expected partial count, got {:?}", other),
    }
    db.assert_idle();
}

#[test]
fn torn_tail_is_partial_count() {
    let db = TestDb::sample();
    truncate_table(&db.home, "users", 2).unwrap();

    let info = db.browser.table_info("users").unwrap();
    assert_eq!(info.record_count.counted(), 2);
    assert!(!info.record_count.is_complete());
}

#[test]
fn export_fails_without_output_on_scan_fault() {
    let db = TestDb::sample();
    corrupt_record(&db.home, "products", 3).unwrap();

    for format in [ExportFormat::Json, ExportFormat::Csv] {
        let out = db.out(&format!("products.{}", format.extension()));
        let err = db.browser.export("products", &out, format, None).unwrap_err();
        assert!(err.is_scan(), "{}: {}", format, err);
        assert!(!out.exists());
    }
    db.assert_idle();
}

#[test]
fn limit_before_fault_succeeds() {
    let db = TestDb::sample();
    corrupt_record(&db.home, "logs", 5).unwrap();

    let out = db.out("logs.csv");
    assert_eq!(db.browser.export_csv("logs", &out, Some(5)).unwrap(), 5);
    assert_eq!(read_csv_lines(&out).len(), 6);
}

#[test]
fn failed_export_keeps_previous_file() {
    let db = TestDb::sample();
    let out = db.out("logs.json");
    db.browser.export_json("logs", &out, None).unwrap();
    let before = std::fs::read_to_string(&out).unwrap();

    append_garbage(&db.home, "logs", &[1, 2, 3]).unwrap();
    assert!(db.browser.export_json("logs", &out, None).is_err());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), before);
}

#[test]
fn missing_table_export_is_not_found() {
    let db = TestDb::sample();
    let err = db
        .browser
        .export_csv("ghost", &db.out("ghost.csv"), None)
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!db.out("ghost.csv").exists());
}
