use serde_json::json;

use crate::editable::{EditError, EditableSet, SaveError};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    get_page, get_required_str, get_str, parse_date_key, parse_month_key, require_admin,
    require_session,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceRecord, AttendanceStatus};
use crate::store::{attendance_default, AttendanceCommit, Store};
use crate::view;

const PAGE_SIZE: usize = 10;

/// The four statuses partition the set, so the counts always sum to the
/// number of rows and `rate` is the present share.
fn counts_with_rate(statuses: &[&AttendanceStatus]) -> serde_json::Value {
    let counts = view::count_by_seeded(statuses, &AttendanceStatus::ALL, |s| *s);
    let lookup = |s: AttendanceStatus| counts.get(&s).copied().unwrap_or(0);
    let present = lookup(AttendanceStatus::Present);
    json!({
        "present": present,
        "absent": lookup(AttendanceStatus::Absent),
        "late": lookup(AttendanceStatus::Late),
        "excused": lookup(AttendanceStatus::Excused),
        "rate": view::percent(present, statuses.len()),
    })
}

fn summary_json(draft: &EditableSet<AttendanceStatus>) -> serde_json::Value {
    let statuses: Vec<&AttendanceStatus> = draft.values().collect();
    counts_with_rate(&statuses)
}

/// Rows in roster order with the staged status merged in.
fn draft_payload(store: &Store, draft: &EditableSet<AttendanceStatus>) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = store
        .teachers
        .iter()
        .filter_map(|t| {
            draft.get(&t.id).map(|status| {
                json!({
                    "teacherId": t.id,
                    "teacherName": t.display_name(),
                    "status": status,
                })
            })
        })
        .collect();
    json!({
        "date": draft.key(),
        "state": draft.state().label(),
        "rows": rows,
        "summary": summary_json(draft),
    })
}

fn open(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let date = parse_date_key(&get_required_str(params, "date")?)?;

    // Re-opening (or switching dates) rebuilds from committed records and
    // discards whatever was staged.
    let rows: Vec<(String, AttendanceStatus)> = state
        .store
        .active_teachers()
        .iter()
        .map(|t| (t.id.clone(), attendance_default(&state.store, &t.id, &date)))
        .collect();
    let draft = EditableSet::initialize(date, rows);
    let payload = draft_payload(&state.store, &draft);
    state.attendance_draft = Some(draft);
    Ok(payload)
}

fn set_status(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let teacher_id = get_required_str(params, "teacherId")?;
    let status = AttendanceStatus::parse(&get_required_str(params, "status")?)
        .ok_or_else(|| HandlerErr::bad_params("unknown attendance status"))?;
    let Some(draft) = state.attendance_draft.as_mut() else {
        return Err(HandlerErr::new("no_draft", "open an attendance date first"));
    };
    match draft.set(&teacher_id, status) {
        Ok(()) => Ok(json!({
            "date": draft.key(),
            "state": draft.state().label(),
            "summary": summary_json(draft),
        })),
        Err(EditError::SaveInProgress) => {
            Err(HandlerErr::new("save_in_progress", "a save is already running"))
        }
        Err(EditError::UnknownRow(id)) => Err(HandlerErr::not_found(format!(
            "no staged row for teacher {}",
            id
        ))),
    }
}

fn stamp_all(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let status = AttendanceStatus::parse(&get_required_str(params, "status")?)
        .ok_or_else(|| HandlerErr::bad_params("unknown attendance status"))?;
    let Some(draft) = state.attendance_draft.as_mut() else {
        return Err(HandlerErr::new("no_draft", "open an attendance date first"));
    };
    match draft.set_all(status) {
        Ok(()) => Ok(json!({
            "date": draft.key(),
            "state": draft.state().label(),
            "summary": summary_json(draft),
        })),
        Err(_) => Err(HandlerErr::new("save_in_progress", "a save is already running")),
    }
}

fn save(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let Some(draft) = state.attendance_draft.as_mut() else {
        return Err(HandlerErr::new("no_draft", "open an attendance date first"));
    };
    let mut sink = AttendanceCommit {
        store: &mut state.store,
    };
    match draft.save(&mut sink) {
        Ok(()) => Ok(json!({
            "saved": true,
            "date": draft.key(),
            "state": draft.state().label(),
            "summary": summary_json(draft),
        })),
        Err(SaveError::SaveInProgress) => {
            Err(HandlerErr::new("save_in_progress", "a save is already running"))
        }
        Err(SaveError::Commit(message)) => Err(HandlerErr::new("save_failed", message)),
    }
}

fn history(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let query = get_str(params, "query");
    let month_raw = get_str(params, "month");
    let status_raw = get_str(params, "status");
    let page = get_page(params);

    let month_sel = match view::categorical(&month_raw) {
        Some(m) => Some(parse_month_key(m)?),
        None => None,
    };
    let status_sel = view::categorical(&status_raw);

    let store = &state.store;
    let scoped = view::restrict(&store.attendance, session.scope.staff_rule(), |r| {
        Some(r.teacher_id.as_str())
    });
    let filtered: Vec<&AttendanceRecord> = scoped
        .into_iter()
        .filter(|r| {
            let name = store.teacher_name(&r.teacher_id);
            view::text_matches(&query, &[name.as_str(), r.date.as_str()])
                && month_sel
                    .as_deref()
                    .map_or(true, |m| r.date.starts_with(m))
                && status_sel.map_or(true, |v| AttendanceStatus::parse(v) == Some(r.status))
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let statuses: Vec<&AttendanceStatus> = filtered.iter().map(|r| &r.status).collect();
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "teacherId": r.teacher_id,
                "teacherName": store.teacher_name(&r.teacher_id),
                "date": r.date,
                "status": r.status,
            })
        })
        .collect();

    Ok(json!({
        "items": rows,
        "page": meta.page,
        "totalCount": meta.total_count,
        "totalPages": meta.total_pages,
        "summary": counts_with_rate(&statuses),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "attendance.open" => open(state, &req.params),
        "attendance.setStatus" => set_status(state, &req.params),
        "attendance.stampAll" => stamp_all(state, &req.params),
        "attendance.save" => save(state),
        "attendance.history" => history(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
