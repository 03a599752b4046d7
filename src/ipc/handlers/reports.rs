use chrono::Utc;
use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_str, parse_month_key, require_admin};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceStatus, CardStatus, PayStatus};
use crate::view;

/// Dashboard overview model. Everything here is computed over the unfiltered
/// baseline; the list pages carry their own filtered summaries.
fn overview(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let month_raw = get_str(params, "month");
    let month = match view::categorical(&month_raw) {
        Some(m) => parse_month_key(m)?,
        None => Utc::now().format("%Y-%m").to_string(),
    };

    let store = &state.store;
    let active_students = store.students.iter().filter(|s| s.active).count();
    let active_teachers = store.teachers.iter().filter(|t| t.active).count();

    let month_attendance: Vec<_> = store
        .attendance
        .iter()
        .filter(|r| r.date.starts_with(&month))
        .collect();
    let present = month_attendance
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count();

    let budget: f64 = store
        .teachers
        .iter()
        .filter(|t| t.active)
        .map(|t| t.monthly_salary)
        .sum();
    let mut paid = view::Tally::default();
    let mut pending = view::Tally::default();
    for p in store.salaries.iter().filter(|p| p.month == month) {
        let t = match p.status {
            PayStatus::Paid => &mut paid,
            PayStatus::Pending => &mut pending,
        };
        t.count += 1;
        t.total += p.amount;
    }

    let total_copies: i64 = store.books.iter().map(|b| b.total_copies).sum();
    let issued_copies: i64 = store.books.iter().map(|b| b.issued_copies).sum();

    let mut cards_pending = 0usize;
    let mut cards_issued = 0usize;
    let mut cards_lost = 0usize;
    for c in &store.id_cards {
        match c.status {
            CardStatus::Pending => cards_pending += 1,
            CardStatus::Issued => cards_issued += 1,
            CardStatus::Lost => cards_lost += 1,
        }
    }

    let total_value: f64 = store
        .inventory
        .iter()
        .map(|i| i.quantity as f64 * i.unit_price)
        .sum();

    let mut latest: Vec<_> = store.notices.iter().collect();
    latest.sort_by(|a, b| b.posted_on.cmp(&a.posted_on).then(a.id.cmp(&b.id)));
    let latest: Vec<serde_json::Value> = latest
        .iter()
        .take(5)
        .map(|n| {
            json!({
                "id": n.id,
                "title": n.title,
                "audience": n.audience,
                "postedOn": n.posted_on,
                "pinned": n.pinned,
            })
        })
        .collect();

    Ok(json!({
        "month": month,
        "students": {
            "total": store.students.len(),
            "active": active_students,
        },
        "teachers": {
            "total": store.teachers.len(),
            "active": active_teachers,
        },
        "classes": store.classes.len(),
        "attendance": {
            "marked": month_attendance.len(),
            "present": present,
            "rate": view::percent(present, month_attendance.len()),
        },
        "payroll": {
            "budget": budget,
            "paid": paid,
            "pending": pending,
        },
        "library": {
            "titles": store.books.len(),
            "totalCopies": total_copies,
            "issued": issued_copies,
            "available": total_copies - issued_copies,
        },
        "idCards": {
            "pending": cards_pending,
            "issued": cards_issued,
            "lost": cards_lost,
        },
        "inventory": {
            "items": store.inventory.len(),
            "totalValue": total_value,
        },
        "notices": latest,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "reports.overview" => overview(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
