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
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request(&mut stdin, &mut reader, "1", "health", json!({}));

    // Before login, list pages refuse rather than leak.
    let denied = request(&mut stdin, &mut reader, "2", "students.list", json!({}));
    assert_eq!(denied.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        denied
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("no_session")
    );

    let _ = request(
        &mut stdin,
        &mut reader,
        "3",
        "session.login",
        json!({ "role": "admin" }),
    );

    let _ = request(&mut stdin, &mut reader, "3b", "classes.list", json!({}));
    let _ = request(&mut stdin, &mut reader, "4", "students.list", json!({}));
    let created = request(
        &mut stdin,
        &mut reader,
        "5",
        "students.create",
        json!({
            "firstName": "Smoke",
            "lastName": "Student",
            "classId": "c5a",
            "admissionNo": "ADM9001"
        }),
    );
    let student_id = created
        .get("result")
        .and_then(|v| v.get("studentId"))
        .and_then(|v| v.as_str())
        .expect("studentId")
        .to_string();
    let _ = request(
        &mut stdin,
        &mut reader,
        "6",
        "students.update",
        json!({ "studentId": student_id, "patch": { "firstName": "Updated" } }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "7",
        "students.delete",
        json!({ "studentId": student_id }),
    );

    let _ = request(&mut stdin, &mut reader, "8", "teachers.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "9",
        "attendance.open",
        json!({ "date": "2025-08-04" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "10",
        "attendance.setStatus",
        json!({ "teacherId": "t01", "status": "late" }),
    );
    let _ = request(&mut stdin, &mut reader, "11", "attendance.save", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "12",
        "attendance.history",
        json!({ "month": "2025-08" }),
    );

    let _ = request(
        &mut stdin,
        &mut reader,
        "13",
        "salary.list",
        json!({ "month": "2025-07" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "14",
        "salary.open",
        json!({ "month": "2025-07" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "15",
        "salary.setStatus",
        json!({ "teacherId": "t08", "status": "paid" }),
    );
    let _ = request(&mut stdin, &mut reader, "16", "salary.save", json!({}));

    let _ = request(&mut stdin, &mut reader, "17", "inventory.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "18",
        "inventory.create",
        json!({ "name": "Globe", "category": "Classroom", "quantity": 6, "unitPrice": 2500.0 }),
    );

    let _ = request(&mut stdin, &mut reader, "19", "notices.list", json!({}));
    let posted = request(
        &mut stdin,
        &mut reader,
        "20",
        "notices.create",
        json!({ "title": "Smoke Notice", "body": "Router smoke.", "audience": "all" }),
    );
    let notice_id = posted
        .get("result")
        .and_then(|v| v.get("noticeId"))
        .and_then(|v| v.as_str())
        .expect("noticeId")
        .to_string();
    let _ = request(
        &mut stdin,
        &mut reader,
        "21",
        "notices.delete",
        json!({ "noticeId": notice_id }),
    );

    let _ = request(&mut stdin, &mut reader, "22", "books.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "23",
        "books.issue",
        json!({ "bookId": "b01" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "24",
        "books.return",
        json!({ "bookId": "b01" }),
    );

    let _ = request(&mut stdin, &mut reader, "25", "idCards.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "26",
        "idCards.updateStatus",
        json!({ "cardId": "card03", "status": "issued" }),
    );

    let _ = request(
        &mut stdin,
        &mut reader,
        "27",
        "reports.overview",
        json!({ "month": "2025-07" }),
    );

    let unknown = request(&mut stdin, &mut reader, "28", "session.logout", json!({}));
    assert_eq!(unknown.get("ok").and_then(|v| v.as_bool()), Some(true));

    drop(stdin);
    let _ = child.wait();
}
