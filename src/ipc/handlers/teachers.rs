use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    get_bool, get_page, get_required_str, get_str, require_admin, require_session,
};
use crate::ipc::types::{AppState, Request};
use crate::model::Teacher;
use crate::view;

const PAGE_SIZE: usize = 10;

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let query = get_str(params, "query");
    let designation_raw = get_str(params, "designation");
    let status_raw = get_str(params, "status");
    let page = get_page(params);

    let store = &state.store;
    let scoped = view::restrict(&store.teachers, session.scope.staff_rule(), |t| {
        Some(t.id.as_str())
    });
    let designation_sel = view::categorical(&designation_raw);
    let status_sel = view::categorical(&status_raw);
    let filtered: Vec<&Teacher> = scoped
        .into_iter()
        .filter(|t| {
            let full_name = format!("{} {}", t.first_name, t.last_name);
            let listed_name = t.display_name();
            view::text_matches(
                &query,
                &[
                    full_name.as_str(),
                    listed_name.as_str(),
                    t.staff_no.as_str(),
                ],
            ) && designation_sel.map_or(true, |d| t.designation.eq_ignore_ascii_case(d))
                && status_sel.map_or(true, |v| match v {
                    "active" => t.active,
                    "inactive" => !t.active,
                    _ => false,
                })
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let active = filtered.iter().filter(|t| t.active).count();
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "firstName": t.first_name,
                "lastName": t.last_name,
                "displayName": t.display_name(),
                "staffNo": t.staff_no,
                "designation": t.designation,
                "monthlySalary": t.monthly_salary,
                "active": t.active,
            })
        })
        .collect();

    Ok(json!({
        "items": rows,
        "page": meta.page,
        "totalCount": meta.total_count,
        "totalPages": meta.total_pages,
        "summary": {
            "total": filtered.len(),
            "active": active,
            "inactive": filtered.len() - active,
        }
    }))
}

fn create(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let first_name = get_required_str(params, "firstName")?.trim().to_string();
    let last_name = get_required_str(params, "lastName")?.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(HandlerErr::bad_params("name must not be empty"));
    }
    let staff_no = get_required_str(params, "staffNo")?.trim().to_string();
    if staff_no.is_empty() {
        return Err(HandlerErr::bad_params("staffNo must not be empty"));
    }
    let designation = get_required_str(params, "designation")?.trim().to_string();
    let monthly_salary = params
        .get("monthlySalary")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params("missing monthlySalary"))?;
    if monthly_salary < 0.0 {
        return Err(HandlerErr::bad_params("monthlySalary must not be negative"));
    }

    let teacher_id = Uuid::new_v4().to_string();
    state.store.teachers.push(Teacher {
        id: teacher_id.clone(),
        first_name,
        last_name,
        staff_no,
        designation,
        monthly_salary,
        active: get_bool(params, "active").unwrap_or(true),
    });

    Ok(json!({ "teacherId": teacher_id }))
}

fn update(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let teacher_id = get_required_str(params, "teacherId")?;
    let patch = params.get("patch").cloned().unwrap_or_else(|| json!({}));

    let Some(teacher) = state.store.teachers.iter_mut().find(|t| t.id == teacher_id) else {
        return Err(HandlerErr::not_found("teacher not found"));
    };

    if let Some(v) = patch.get("firstName").and_then(|v| v.as_str()) {
        teacher.first_name = v.trim().to_string();
    }
    if let Some(v) = patch.get("lastName").and_then(|v| v.as_str()) {
        teacher.last_name = v.trim().to_string();
    }
    if let Some(v) = patch.get("designation").and_then(|v| v.as_str()) {
        teacher.designation = v.trim().to_string();
    }
    if let Some(v) = patch.get("monthlySalary").and_then(|v| v.as_f64()) {
        if v < 0.0 {
            return Err(HandlerErr::bad_params("monthlySalary must not be negative"));
        }
        teacher.monthly_salary = v;
    }
    if let Some(v) = patch.get("active").and_then(|v| v.as_bool()) {
        teacher.active = v;
    }

    Ok(json!({ "updated": true }))
}

fn delete(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let teacher_id = get_required_str(params, "teacherId")?;
    let Some(pos) = state.store.teachers.iter().position(|t| t.id == teacher_id) else {
        return Err(HandlerErr::not_found("teacher not found"));
    };
    // Salary and attendance history referencing the teacher stays; those rows
    // render with a blank name rather than disappearing.
    state.store.teachers.remove(pos);
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "teachers.list" => list(state, &req.params),
        "teachers.create" => create(state, &req.params),
        "teachers.update" => update(state, &req.params),
        "teachers.delete" => delete(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
