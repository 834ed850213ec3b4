//! Open/close state machine and resource release

use crate::common::*;
use wtbrowse::OpenOptions;

#[test]
fn operations_require_open_browser() {
    let db = TestDb::sample();
    let mut browser = Browser::new(&db.home);

    assert!(matches!(browser.list_tables(), Err(BrowseError::NotConnected)));
    browser.open().unwrap();
    assert!(browser.list_tables().is_ok());
    browser.close().unwrap();
    assert!(matches!(
        browser.table_info("users"),
        Err(BrowseError::NotConnected)
    ));
}

#[test]
fn close_twice_is_noop() {
    let mut db = TestDb::sample();
    db.browser.close().unwrap();
    db.browser.close().unwrap();
    assert!(!db.browser.is_open());
}

#[test]
fn open_errors_leave_browser_closed() {
    let dir = TempDir::new().unwrap();

    let mut missing = Browser::new(dir.path().join("missing"));
    assert!(matches!(missing.open(), Err(BrowseError::Path { .. })));
    assert!(!missing.is_open());

    let mut empty = Browser::new(dir.path());
    assert!(matches!(empty.open(), Err(BrowseError::Connection { .. })));
    assert!(!empty.is_open());
}

#[test]
fn write_access_is_refused() {
    let db = TestDb::sample();
    let mut browser =
        Browser::with_options(&db.home, OpenOptions::new().engine_config("create"));
    let err = browser.open().unwrap_err();
    assert!(matches!(err, BrowseError::Connection { .. }));
}

#[test]
fn abandoned_stream_releases_handles() {
    let db = TestDb::sample();
    {
        let mut stream = db.browser.stream("logs", None).unwrap();
        stream.next().unwrap().unwrap();
        stream.next().unwrap().unwrap();
        assert!(!db.browser.stats().unwrap().is_idle());
    }
    db.assert_idle();
}

#[test]
fn every_operation_releases_handles() {
    let db = TestDb::sample();
    db.browser.list_tables().unwrap();
    db.browser.table_info("users").unwrap();
    db.browser.table_info("nope").unwrap();
    db.browser.stream("logs", Some(3)).unwrap().for_each(drop);
    let _ = db.browser.export_json("nope", &db.out("nope.json"), None);
    db.browser
        .export_all(&db.dir.path().join("all"), ExportFormat::Json, Some(1))
        .unwrap();
    db.assert_idle();
}

#[test]
fn catalog_is_read_fresh_each_call() {
    let db = TestDb::sample();
    assert_eq!(db.browser.list_tables().unwrap().len(), 3);

    FixtureBuilder::new(&db.home)
        .table("users", "i", "S")
        .table("zebra", "i", "S")
        .build()
        .unwrap();

    assert_eq!(db.browser.list_tables().unwrap(), vec!["users", "zebra"]);
}
