use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoold");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schoold");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn teacher_scope_is_the_union_of_owned_classes() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // t05 teaches mathematics in 5-A and 7-A but runs neither class.
    let login = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "teacher", "teacherId": "t05" }),
    );
    let owned = login
        .get("scope")
        .and_then(|s| s.get("ownedClassIds"))
        .and_then(|v| v.as_array())
        .expect("ownedClassIds");
    let owned: Vec<&str> = owned.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(owned, ["c5a", "c7a"]);

    let students = request_ok(&mut stdin, &mut reader, "2", "students.list", json!({}));
    assert_eq!(students.get("totalCount").and_then(|v| v.as_u64()), Some(19));
    for item in students.get("items").and_then(|v| v.as_array()).unwrap() {
        let class = item.get("className").and_then(|v| v.as_str()).unwrap_or("");
        assert!(class == "5-A" || class == "7-A", "leaked row: {}", item);
    }

    // The class filter options are scoped the same way as the rows.
    let classes = request_ok(&mut stdin, &mut reader, "2b", "classes.list", json!({}));
    let ids: Vec<&str> = classes
        .get("classes")
        .and_then(|v| v.as_array())
        .expect("classes")
        .iter()
        .filter_map(|c| c.get("id").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(ids, ["c5a", "c7a"]);

    // Class-teacher ownership counts too: t01 runs 5-A and teaches in 6-A.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "session.login",
        json!({ "role": "teacher", "teacherId": "t01" }),
    );
    let students = request_ok(&mut stdin, &mut reader, "4", "students.list", json!({}));
    assert_eq!(students.get("totalCount").and_then(|v| v.as_u64()), Some(18));
}

#[test]
fn staff_keyed_pages_show_only_the_teacher_themselves() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "teacher", "teacherId": "t05" }),
    );

    let teachers = request_ok(&mut stdin, &mut reader, "2", "teachers.list", json!({}));
    assert_eq!(teachers.get("totalCount").and_then(|v| v.as_u64()), Some(1));
    let first = teachers
        .get("items")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .expect("own row");
    assert_eq!(first.get("id").and_then(|v| v.as_str()), Some("t05"));

    // Attendance history: own records only. t05 is seeded absent on 07-02.
    let history = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.history",
        json!({ "month": "2025-07" }),
    );
    assert_eq!(history.get("totalCount").and_then(|v| v.as_u64()), Some(2));
    let absent = history
        .get("summary")
        .and_then(|s| s.get("absent"))
        .and_then(|v| v.as_i64());
    assert_eq!(absent, Some(1));
}

#[test]
fn mutating_and_admin_pages_are_forbidden_for_teachers() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "teacher", "teacherId": "t03" }),
    );

    let create = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({
            "firstName": "X",
            "lastName": "Y",
            "classId": "c7a",
            "admissionNo": "ADM9100"
        }),
    );
    assert_eq!(error_code(&create), "forbidden");

    for (id, method) in [
        ("3", "attendance.open"),
        ("4", "inventory.list"),
        ("5", "books.list"),
        ("6", "idCards.list"),
        ("7", "reports.overview"),
    ] {
        let refused = request(
            &mut stdin,
            &mut reader,
            id,
            method,
            json!({ "date": "2025-08-04" }),
        );
        assert_eq!(error_code(&refused), "forbidden", "method {}", method);
    }
}

#[test]
fn unknown_roles_fail_closed_everywhere() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // An unrecognized role gets a session whose scope sees nothing, never
    // the unrestricted set.
    let login = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "clerk" }),
    );
    assert_eq!(
        login
            .get("scope")
            .and_then(|s| s.get("kind"))
            .and_then(|v| v.as_str()),
        Some("denied")
    );

    for (id, method) in [
        ("2", "students.list"),
        ("3", "teachers.list"),
        ("4", "salary.list"),
        ("5", "attendance.history"),
        ("6", "notices.list"),
    ] {
        let result = request_ok(&mut stdin, &mut reader, id, method, json!({}));
        assert_eq!(
            result.get("totalCount").and_then(|v| v.as_u64()),
            Some(0),
            "method {} leaked rows",
            method
        );
    }
}

#[test]
fn notices_respect_audience_targeting() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "admin" }),
    );
    let all = request_ok(&mut stdin, &mut reader, "2", "notices.list", json!({}));
    assert_eq!(all.get("totalCount").and_then(|v| v.as_u64()), Some(5));
    // Pinned notices lead the list.
    let first = all
        .get("items")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .expect("first notice");
    assert_eq!(first.get("id").and_then(|v| v.as_str()), Some("n01"));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "session.login",
        json!({ "role": "teacher", "teacherId": "t02" }),
    );
    let mine = request_ok(&mut stdin, &mut reader, "4", "notices.list", json!({}));
    assert_eq!(mine.get("totalCount").and_then(|v| v.as_u64()), Some(4));
    for item in mine.get("items").and_then(|v| v.as_array()).unwrap() {
        assert_ne!(
            item.get("audience").and_then(|v| v.as_str()),
            Some("students"),
            "student-only circular leaked to a teacher"
        );
    }
}

#[test]
fn logging_out_closes_the_session() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "admin" }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "2", "session.logout", json!({}));

    let refused = request(&mut stdin, &mut reader, "3", "students.list", json!({}));
    assert_eq!(error_code(&refused), "no_session");
}
