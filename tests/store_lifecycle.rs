#[path = "../src/store.rs"]
mod store;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use store::{Dataset, StudentRecord};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn record(id: &str, name: &str, marks: f64, attendance: f64, logins: i64) -> StudentRecord {
    StudentRecord {
        student_id: id.to_string(),
        name: name.to_string(),
        marks,
        attendance,
        logins,
    }
}

#[test]
fn save_then_load_roundtrips_all_columns() {
    let dir = temp_dir("perfdash-store-roundtrip");
    let path = dir.join("students.csv");

    let mut ds = Dataset::create(&path);
    ds.append(record("S001", "Alice Johnson", 95.0, 96.0, 40));
    ds.append(record("S002", "Lee, Brian \"B\"", 55.5, 82.0, 18));
    ds.save().expect("save dataset");

    let reloaded = Dataset::load(&path).expect("reload dataset");
    assert_eq!(reloaded.records(), ds.records());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn save_replaces_atomically_leaving_no_temp_file() {
    let dir = temp_dir("perfdash-store-atomic");
    let path = dir.join("students.csv");

    let mut ds = Dataset::create(&path);
    ds.append(record("S001", "Alice", 80.0, 90.0, 12));
    ds.save().expect("first save");
    ds.append(record("S002", "Brian", 60.0, 70.0, 5));
    ds.save().expect("second save");

    let leftovers: Vec<_> = std::fs::read_dir(&dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(leftovers, vec!["students.csv".to_string()]);

    let reloaded = Dataset::load(&path).expect("reload");
    assert_eq!(reloaded.len(), 2);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_student_id_column_is_synthesized_positionally() {
    let dir = temp_dir("perfdash-store-noid");
    let path = dir.join("students.csv");
    std::fs::write(
        &path,
        "Name,Marks,Attendance,Logins\nAlice,90,95,30\nBrian,45,60,4\n",
    )
    .expect("write csv");

    let ds = Dataset::load(&path).expect("load");
    assert_eq!(ds.records()[0].student_id, "S001");
    assert_eq!(ds.records()[1].student_id, "S002");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn persisted_risk_column_is_ignored_on_load() {
    let dir = temp_dir("perfdash-store-risk-col");
    let path = dir.join("students.csv");
    std::fs::write(
        &path,
        "StudentID,Name,Marks,Attendance,Logins,Risk\nS001,Alice,90,95,30,Totally Wrong\n",
    )
    .expect("write csv");

    let ds = Dataset::load(&path).expect("load");
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.records()[0].name, "Alice");
    assert_eq!(ds.records()[0].marks, 90.0);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn next_id_is_monotonic_and_zero_padded() {
    let dir = temp_dir("perfdash-store-nextid");
    let path = dir.join("students.csv");

    let mut ds = Dataset::create(&path);
    assert_eq!(ds.next_student_id(), "S001");
    ds.append(record("S009", "Nine", 50.0, 50.0, 1));
    assert_eq!(ds.next_student_id(), "S010");
    // Removing the newest row frees its slot; earlier gaps never reopen.
    ds.append(record("S010", "Ten", 50.0, 50.0, 1));
    ds.remove("S009");
    assert_eq!(ds.next_student_id(), "S011");
    ds.append(record("S1000", "Wide", 50.0, 50.0, 1));
    assert_eq!(ds.next_student_id(), "S1001");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn duplicate_probe_matches_name_case_insensitively() {
    let dir = temp_dir("perfdash-store-dup");
    let mut ds = Dataset::create(&dir.join("students.csv"));
    ds.append(record("S001", "Alice Johnson", 80.0, 90.0, 12));

    assert!(ds.find_duplicate("alice johnson", 80.0, 90.0, 12).is_some());
    assert!(ds.find_duplicate("Alice Johnson", 80.0, 90.0, 11).is_none());
    assert!(ds.find_duplicate("Alice Johnson", 81.0, 90.0, 12).is_none());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn search_matches_id_and_name_substrings() {
    let dir = temp_dir("perfdash-store-search");
    let mut ds = Dataset::create(&dir.join("students.csv"));
    ds.append(record("S001", "Alice Johnson", 80.0, 90.0, 12));
    ds.append(record("S002", "Brian Lee", 60.0, 70.0, 5));
    ds.append(record("S010", "Alison Brown", 40.0, 55.0, 2));

    assert_eq!(ds.search("ali").len(), 2);
    assert_eq!(ds.search("s00").len(), 2);
    assert_eq!(ds.search("LEE").len(), 1);
    assert_eq!(ds.search("zzz").len(), 0);
    assert_eq!(ds.search("  ").len(), 0);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn remove_deletes_exactly_one_record() {
    let dir = temp_dir("perfdash-store-remove");
    let mut ds = Dataset::create(&dir.join("students.csv"));
    ds.append(record("S001", "Alice", 80.0, 90.0, 12));
    ds.append(record("S002", "Brian", 60.0, 70.0, 5));

    let removed = ds.remove("s002").expect("case-insensitive removal");
    assert_eq!(removed.name, "Brian");
    assert_eq!(ds.len(), 1);
    assert!(ds.remove("S002").is_none());
    assert_eq!(ds.len(), 1);

    let _ = std::fs::remove_dir_all(dir);
}
