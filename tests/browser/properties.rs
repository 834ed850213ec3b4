//! Generated-table properties

use crate::common::*;
use proptest::prelude::*;
use wtbrowse::decode_hex;

fn table_of(values: &[Vec<u8>]) -> TestDb {
    let values = values.to_vec();
    TestDb::with(move |mut b| {
        b = b.table("t", "q", "u");
        for (i, v) in values.into_iter().enumerate() {
            b = b.insert("t", i as i64, v);
        }
        b
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn count_and_exports_agree(values in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..30)) {
        let db = table_of(&values);
        let n = values.len() as u64;

        prop_assert_eq!(db.browser.table_info("t").unwrap().record_count, RecordCount::Complete(n));

        let out = db.out("t.json");
        prop_assert_eq!(db.browser.export_json("t", &out, None).unwrap(), n);
        prop_assert_eq!(read_json(&out)["record_count"].as_u64(), Some(n));
        db.assert_idle();
    }

    #[test]
    fn limit_takes_prefix(count in 0usize..20, limit in 0u64..30) {
        let values: Vec<Vec<u8>> = (0..count).map(|i| format!("v{}", i).into_bytes()).collect();
        let db = table_of(&values);

        let out = db.out("t.csv");
        let written = db.browser.export_csv("t", &out, Some(limit)).unwrap();
        prop_assert_eq!(written, limit.min(count as u64));

        let lines = read_csv_lines(&out);
        prop_assert_eq!(lines.len() as u64, written + 1);
        for (i, line) in lines.iter().skip(1).enumerate() {
            prop_assert_eq!(line, &format!("{},v{}", i, i));
        }
    }

    #[test]
    fn exported_bytes_are_recoverable(values in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..16), 1..10)) {
        let db = table_of(&values);
        let out = db.out("t.json");
        db.browser.export_json("t", &out, None).unwrap();

        let doc = read_json(&out);
        for (record, original) in doc["records"].as_array().unwrap().iter().zip(&values) {
            let rendered = record["value"].as_str().unwrap();
            match std::str::from_utf8(original) {
                Ok(text) => prop_assert_eq!(rendered, text),
                Err(_) => {
                    let decoded = decode_hex(rendered);
                    prop_assert_eq!(decoded.as_ref(), Some(original));
                }
            }
        }
    }
}
