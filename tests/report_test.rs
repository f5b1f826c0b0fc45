//! Integration tests for the report store.

use scancheck::validate::{GroupConsensus, MainCheck};
use scancheck::{Document, ReportSchema, ReportStore, ValidationReport};

fn report(name: &str, groups: &[&str]) -> ValidationReport {
    let document = Document::from_path(name)
        .with_page_count(34 + 4 * groups.len() as u32)
        .with_digest("d41d8cd98f00b204e9800998ecf8427e");
    let consensus: Vec<GroupConsensus> = groups
        .iter()
        .enumerate()
        .map(|(i, id)| GroupConsensus {
            group_index: i + 1,
            expected: id.to_string(),
            decoded: id.to_string(),
            issue: None,
        })
        .collect();
    ValidationReport::assemble(
        &document,
        Some(document.expected_identifier.clone()),
        MainCheck::default(),
        &consensus,
    )
}

#[test]
fn test_reopen_keeps_rows_and_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let mut store = ReportStore::open(&path).unwrap();
    assert_eq!(store.append(&report("a.pdf", &["X", "Y"])).unwrap(), Some(1));
    assert_eq!(store.append(&report("b.pdf", &[])).unwrap(), Some(2));
    drop(store);

    let store = ReportStore::open(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.schema(), ReportSchema::new(2));
    assert!(store.contains("a.pdf"));
    assert!(store.contains("b.pdf"));
    assert!(!store.contains("c.pdf"));
    assert_eq!(store.filenames(), vec!["a.pdf", "b.pdf"]);
    assert_eq!(store.next_serial(), 3);
}

#[test]
fn test_duplicate_append_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let mut store = ReportStore::open(&path).unwrap();
    store.append(&report("a.pdf", &["X"])).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    assert_eq!(store.append(&report("a.pdf", &["X", "Y", "Z"])).unwrap(), None);
    assert_eq!(store.len(), 1);
    assert_eq!(store.schema().supplemental_groups(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_growth_from_two_to_three_groups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let mut store = ReportStore::open(&path).unwrap();
    store.append(&report("a.pdf", &["X", "Y"])).unwrap();
    store.append(&report("b.pdf", &["P"])).unwrap();
    store.append(&report("c.pdf", &["Q", "R", "S"])).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "s.no,filename,md5,total_pages,expected_barcode,decoded_barcode,\
             supp_expected_barcode_1,supp_decoded_barcode_1,\
             supp_expected_barcode_2,supp_decoded_barcode_2,\
             supp_expected_barcode_3,supp_decoded_barcode_3,status,issue",
            "1,a.pdf,d41d8cd98f00b204e9800998ecf8427e,42,A,A,X,X,Y,Y,-,-,match,-",
            "2,b.pdf,d41d8cd98f00b204e9800998ecf8427e,38,B,B,P,P,-,-,-,-,match,-",
            "3,c.pdf,d41d8cd98f00b204e9800998ecf8427e,46,C,C,Q,Q,R,R,S,S,match,-",
        ]
    );
    assert_eq!(store.rows().iter().map(Vec::len).max(), Some(14));
    assert_eq!(store.rows().iter().map(Vec::len).min(), Some(14));
}
