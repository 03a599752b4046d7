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

// Fixture totals: twelve active teachers, 634,500 a month all told; July is
// seeded with seven payments settled (383,500) and five outstanding.
const BUDGET: f64 = 634_500.0;
const JULY_PAID: f64 = 383_500.0;

fn summary_num(result: &serde_json::Value, path: &[&str]) -> f64 {
    let mut cur = result.get("summary").expect("summary");
    for key in path {
        cur = cur.get(key).unwrap_or_else(|| panic!("summary.{}", key));
    }
    cur.as_f64().expect("numeric summary field")
}

#[test]
fn budget_ignores_table_filters_while_tallies_follow_them() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "admin" }),
    );

    let july = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "salary.list",
        json!({ "month": "2025-07" }),
    );
    assert_eq!(july.get("totalCount").and_then(|v| v.as_u64()), Some(12));
    assert_eq!(july.get("totalPages").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(
        july.get("items").and_then(|v| v.as_array()).map(Vec::len),
        Some(8)
    );
    assert_eq!(summary_num(&july, &["budget"]), BUDGET);
    assert_eq!(summary_num(&july, &["paid", "count"]), 7.0);
    assert_eq!(summary_num(&july, &["paid", "total"]), JULY_PAID);
    assert_eq!(summary_num(&july, &["pending", "count"]), 5.0);
    assert_eq!(summary_num(&july, &["pending", "total"]), BUDGET - JULY_PAID);

    // Filtering the table down to pending rows moves the tallies but the
    // budget card stays put.
    let pending = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "salary.list",
        json!({ "month": "2025-07", "status": "pending" }),
    );
    assert_eq!(pending.get("totalCount").and_then(|v| v.as_u64()), Some(5));
    assert_eq!(summary_num(&pending, &["budget"]), BUDGET);
    assert_eq!(summary_num(&pending, &["paid", "count"]), 0.0);
    assert_eq!(summary_num(&pending, &["pending", "count"]), 5.0);
}

#[test]
fn payroll_run_stages_and_commits() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "admin" }),
    );

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "salary.open",
        json!({ "month": "2025-07" }),
    );
    assert_eq!(
        opened.get("rows").and_then(|v| v.as_array()).map(Vec::len),
        Some(12)
    );
    assert_eq!(summary_num(&opened, &["paid", "count"]), 7.0);

    let edited = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "salary.setStatus",
        json!({ "teacherId": "t08", "status": "paid" }),
    );
    assert_eq!(summary_num(&edited, &["paid", "count"]), 8.0);
    assert_eq!(edited.get("state").and_then(|v| v.as_str()), Some("edited"));

    let saved = request_ok(&mut stdin, &mut reader, "4", "salary.save", json!({}));
    assert_eq!(saved.get("saved").and_then(|v| v.as_bool()), Some(true));

    // The committed run is what the list page now shows.
    let paid = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "salary.list",
        json!({ "month": "2025-07", "status": "paid" }),
    );
    assert_eq!(paid.get("totalCount").and_then(|v| v.as_u64()), Some(8));
}

#[test]
fn an_unseeded_month_defaults_to_pending_at_current_salary() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "admin" }),
    );

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "salary.open",
        json!({ "month": "2025-08" }),
    );
    assert_eq!(summary_num(&opened, &["pending", "count"]), 12.0);
    assert_eq!(summary_num(&opened, &["paid", "count"]), 0.0);
    assert_eq!(summary_num(&opened, &["budget"]), BUDGET);

    // Nothing is committed until save; August still has no payment rows.
    let august = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "salary.list",
        json!({ "month": "2025-08" }),
    );
    assert_eq!(august.get("totalCount").and_then(|v| v.as_u64()), Some(0));

    let _ = request_ok(&mut stdin, &mut reader, "4", "salary.save", json!({}));
    let august = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "salary.list",
        json!({ "month": "2025-08" }),
    );
    assert_eq!(august.get("totalCount").and_then(|v| v.as_u64()), Some(12));
}

#[test]
fn teachers_see_their_own_payroll_only() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "role": "teacher", "teacherId": "t05" }),
    );

    let mine = request_ok(&mut stdin, &mut reader, "2", "salary.list", json!({}));
    assert_eq!(mine.get("totalCount").and_then(|v| v.as_u64()), Some(2));
    for item in mine.get("items").and_then(|v| v.as_array()).unwrap() {
        assert_eq!(item.get("teacherId").and_then(|v| v.as_str()), Some("t05"));
    }
    // The budget baseline is scoped too: one salary, not the school's.
    assert_eq!(summary_num(&mine, &["budget"]), 52_000.0);

    // Running payroll stays an admin affordance.
    let refused = request(
        &mut stdin,
        &mut reader,
        "3",
        "salary.open",
        json!({ "month": "2025-07" }),
    );
    assert_eq!(
        refused
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("forbidden")
    );
}
