//! Comment batch export tests.

use revex::export::{export_comments, ExportError};
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut f = std::fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

fn fragment(account: i64, message: &str) -> serde_json::Value {
    json!({
        "author": {"_account_id": account},
        "patch_set": 1,
        "id": "c1",
        "line": 10,
        "updated": "2019-04-01 10:21:03.000000000",
        "message": message,
        "unresolved": false
    })
}

fn read_csv(dir: &TempDir) -> Vec<String> {
    let content = std::fs::read_to_string(dir.path().join("comments.csv")).unwrap();
    content.lines().map(str::to_string).collect()
}

#[test]
fn two_files_yield_header_plus_two_rows() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_file(
        &source,
        "comments_101.json",
        &json!({"a": fragment(42, "nit: rename")}).to_string(),
    );
    write_file(
        &source,
        "batch_202.json",
        &json!({"b": fragment(43, "looks good")}).to_string(),
    );

    let stats = export_comments(source.path(), dest.path()).unwrap();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.rows, 2);

    let lines = read_csv(&dest);
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "change_id,filename,author,patch_set,id,line,in_reply_to,updated,message,unresolved"
    );

    let mut change_ids: Vec<String> = lines[1..]
        .iter()
        .map(|line| line.split(',').next().unwrap().to_string())
        .collect();
    change_ids.sort();
    assert_eq!(change_ids, vec!["101", "202"]);
    assert!(change_ids.iter().all(|id| !id.is_empty()));
}

#[test]
fn row_carries_every_column() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_file(
        &source,
        "comments_9.json",
        &json!({"k": {
            "author": {"_account_id": 7},
            "patch_set": 3,
            "id": "deadbeef",
            "line": 120,
            "in_reply_to": "cafebabe",
            "updated": "2019-04-02 09:00:00.000000000",
            "message": "needs a test",
            "unresolved": true
        }})
        .to_string(),
    );

    export_comments(source.path(), dest.path()).unwrap();
    let lines = read_csv(&dest);
    assert_eq!(
        lines[1],
        "9,comments_9.json,7,3,deadbeef,120,cafebabe,2019-04-02 09:00:00.000000000,needs a test,true"
    );
}

#[test]
fn absent_in_reply_to_renders_as_empty_string() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_file(
        &source,
        "comments_5.json",
        &json!({"k": fragment(1, "root comment")}).to_string(),
    );

    export_comments(source.path(), dest.path()).unwrap();
    let lines = read_csv(&dest);
    let fields: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(fields[6], "");
}

#[test]
fn messages_with_delimiters_are_quoted() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_file(
        &source,
        "comments_77.json",
        &json!({"k": fragment(1, "first, \"quoted\" part\nsecond line")}).to_string(),
    );

    export_comments(source.path(), dest.path()).unwrap();
    let content = std::fs::read_to_string(dest.path().join("comments.csv")).unwrap();
    assert!(
        content.contains("\"first, \"\"quoted\"\" part\nsecond line\""),
        "got: {content}"
    );
}

#[test]
fn filename_without_change_token_aborts() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_file(
        &source,
        "comments.json",
        &json!({"k": fragment(1, "x")}).to_string(),
    );

    let err = export_comments(source.path(), dest.path()).unwrap_err();
    assert!(matches!(err, ExportError::InvalidFilename(name) if name == "comments.json"));
}

#[test]
fn malformed_fragment_aborts_and_names_the_file() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    // `line` is missing — the record must not produce a partial row.
    write_file(
        &source,
        "comments_3.json",
        &json!({"k": {
            "author": {"_account_id": 7},
            "patch_set": 3,
            "id": "deadbeef",
            "updated": "2019-04-02 09:00:00.000000000",
            "message": "broken",
            "unresolved": true
        }})
        .to_string(),
    );

    let err = export_comments(source.path(), dest.path()).unwrap_err();
    match err {
        ExportError::Json { file, .. } => assert_eq!(file, "comments_3.json"),
        other => panic!("expected Json error, got {other:?}"),
    }
}

#[test]
fn subdirectories_are_skipped() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    std::fs::create_dir(source.path().join("nested")).unwrap();
    write_file(
        &source,
        "comments_8.json",
        &json!({"k": fragment(2, "ok")}).to_string(),
    );

    let stats = export_comments(source.path(), dest.path()).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(stats.rows, 1);
}

#[test]
fn empty_source_directory_yields_header_only() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let stats = export_comments(source.path(), dest.path()).unwrap();
    assert_eq!(stats.files, 0);
    assert_eq!(stats.rows, 0);
    assert_eq!(read_csv(&dest).len(), 1);
}
