use serde_json::json;

use crate::editable::{EditError, EditableSet, SaveError};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    get_page, get_required_str, get_str, parse_month_key, require_admin, require_session,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{PayDraft, PayStatus, SalaryPayment};
use crate::store::{payroll_default, PayrollCommit, Store};
use crate::view::{self, Tally};

const PAGE_SIZE: usize = 8;

fn pay_tallies<'a>(statuses: impl Iterator<Item = (&'a PayStatus, f64)>) -> (Tally, Tally) {
    let mut paid = Tally::default();
    let mut pending = Tally::default();
    for (status, amount) in statuses {
        let t = match status {
            PayStatus::Paid => &mut paid,
            PayStatus::Pending => &mut pending,
        };
        t.count += 1;
        t.total += amount;
    }
    (paid, pending)
}

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
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
    let scoped = view::restrict(&store.salaries, session.scope.staff_rule(), |p| {
        Some(p.teacher_id.as_str())
    });
    let filtered: Vec<&SalaryPayment> = scoped
        .into_iter()
        .filter(|p| {
            let name = store.teacher_name(&p.teacher_id);
            view::text_matches(&query, &[name.as_str(), p.month.as_str()])
                && month_sel.as_deref().map_or(true, |m| p.month == m)
                && status_sel.map_or(true, |v| PayStatus::parse(v) == Some(p.status))
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    // Paid/pending follow the table. The budget card is the monthly
    // commitment across all active staff in scope and does not move with
    // table filters.
    let (paid, pending) = pay_tallies(filtered.iter().map(|p| (&p.status, p.amount)));
    let staff = view::restrict(&store.teachers, session.scope.staff_rule(), |t| {
        Some(t.id.as_str())
    });
    let budget: f64 = staff
        .iter()
        .filter(|t| t.active)
        .map(|t| t.monthly_salary)
        .sum();

    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "teacherId": p.teacher_id,
                "teacherName": store.teacher_name(&p.teacher_id),
                "month": p.month,
                "amount": p.amount,
                "status": p.status,
            })
        })
        .collect();

    Ok(json!({
        "items": rows,
        "page": meta.page,
        "totalCount": meta.total_count,
        "totalPages": meta.total_pages,
        "summary": {
            "budget": budget,
            "paid": paid,
            "pending": pending,
        }
    }))
}

fn draft_payload(store: &Store, draft: &EditableSet<PayDraft>) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = store
        .teachers
        .iter()
        .filter_map(|t| {
            draft.get(&t.id).map(|d| {
                json!({
                    "teacherId": t.id,
                    "teacherName": t.display_name(),
                    "amount": d.amount,
                    "status": d.status,
                })
            })
        })
        .collect();
    let (paid, pending) = pay_tallies(draft.values().map(|d| (&d.status, d.amount)));
    json!({
        "month": draft.key(),
        "state": draft.state().label(),
        "rows": rows,
        "summary": {
            "budget": draft.values().map(|d| d.amount).sum::<f64>(),
            "paid": paid,
            "pending": pending,
        },
    })
}

fn open(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let month = parse_month_key(&get_required_str(params, "month")?)?;

    let rows: Vec<(String, PayDraft)> = state
        .store
        .active_teachers()
        .iter()
        .map(|t| (t.id.clone(), payroll_default(&state.store, t, &month)))
        .collect();
    let draft = EditableSet::initialize(month, rows);
    let payload = draft_payload(&state.store, &draft);
    state.payroll_draft = Some(draft);
    Ok(payload)
}

fn set_status(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let teacher_id = get_required_str(params, "teacherId")?;
    let status = PayStatus::parse(&get_required_str(params, "status")?)
        .ok_or_else(|| HandlerErr::bad_params("status must be paid or pending"))?;
    let Some(draft) = state.payroll_draft.as_mut() else {
        return Err(HandlerErr::new("no_draft", "open a payroll month first"));
    };
    let Some(existing) = draft.get(&teacher_id).copied() else {
        return Err(HandlerErr::not_found(format!(
            "no staged row for teacher {}",
            teacher_id
        )));
    };
    match draft.set(
        &teacher_id,
        PayDraft {
            amount: existing.amount,
            status,
        },
    ) {
        Ok(()) => {
            let (paid, pending) = pay_tallies(draft.values().map(|d| (&d.status, d.amount)));
            Ok(json!({
                "month": draft.key(),
                "state": draft.state().label(),
                "summary": { "paid": paid, "pending": pending },
            }))
        }
        Err(EditError::SaveInProgress) => {
            Err(HandlerErr::new("save_in_progress", "a save is already running"))
        }
        Err(EditError::UnknownRow(id)) => Err(HandlerErr::not_found(format!(
            "no staged row for teacher {}",
            id
        ))),
    }
}

fn save(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let Some(draft) = state.payroll_draft.as_mut() else {
        return Err(HandlerErr::new("no_draft", "open a payroll month first"));
    };
    let mut sink = PayrollCommit {
        store: &mut state.store,
    };
    match draft.save(&mut sink) {
        Ok(()) => {
            let (paid, pending) = pay_tallies(draft.values().map(|d| (&d.status, d.amount)));
            Ok(json!({
                "saved": true,
                "month": draft.key(),
                "state": draft.state().label(),
                "summary": { "paid": paid, "pending": pending },
            }))
        }
        Err(SaveError::SaveInProgress) => {
            Err(HandlerErr::new("save_in_progress", "a save is already running"))
        }
        Err(SaveError::Commit(message)) => Err(HandlerErr::new("save_failed", message)),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "salary.list" => list(state, &req.params),
        "salary.open" => open(state, &req.params),
        "salary.setStatus" => set_status(state, &req.params),
        "salary.save" => save(state),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
