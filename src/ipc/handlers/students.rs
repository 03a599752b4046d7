use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    get_bool, get_page, get_required_str, get_str, require_admin, require_session,
};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use crate::view;

const PAGE_SIZE: usize = 10;

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let query = get_str(params, "query");
    let class_raw = get_str(params, "classId");
    let status_raw = get_str(params, "status");
    let page = get_page(params);

    let store = &state.store;
    let scoped = view::restrict(&store.students, session.scope.class_rule(), |s| {
        Some(s.class_id.as_str())
    });
    let class_sel = view::categorical(&class_raw);
    let status_sel = view::categorical(&status_raw);
    let filtered: Vec<&Student> = scoped
        .into_iter()
        .filter(|s| {
            let full_name = format!("{} {}", s.first_name, s.last_name);
            let listed_name = s.display_name();
            view::text_matches(
                &query,
                &[
                    full_name.as_str(),
                    listed_name.as_str(),
                    s.admission_no.as_str(),
                ],
            ) && class_sel.map_or(true, |c| s.class_id == c)
                && status_sel.map_or(true, |v| match v {
                    "active" => s.active,
                    "inactive" => !s.active,
                    _ => false,
                })
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let active = filtered.iter().filter(|s| s.active).count();
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "firstName": s.first_name,
                "lastName": s.last_name,
                "displayName": s.display_name(),
                "admissionNo": s.admission_no,
                "classId": s.class_id,
                "className": store.class_name(&s.class_id),
                "guardianPhone": s.guardian_phone,
                "active": s.active,
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
    let class_id = get_required_str(params, "classId")?;
    if state.store.class(&class_id).is_none() {
        return Err(HandlerErr::not_found("class not found"));
    }
    let admission_no = get_required_str(params, "admissionNo")?.trim().to_string();
    if admission_no.is_empty() {
        return Err(HandlerErr::bad_params("admissionNo must not be empty"));
    }

    let student_id = Uuid::new_v4().to_string();
    state.store.students.push(Student {
        id: student_id.clone(),
        first_name,
        last_name,
        admission_no,
        class_id,
        guardian_phone: get_str(params, "guardianPhone"),
        active: get_bool(params, "active").unwrap_or(true),
    });

    Ok(json!({ "studentId": student_id }))
}

fn update(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let student_id = get_required_str(params, "studentId")?;
    let patch = params.get("patch").cloned().unwrap_or_else(|| json!({}));

    if let Some(class_id) = patch.get("classId").and_then(|v| v.as_str()) {
        if state.store.class(class_id).is_none() {
            return Err(HandlerErr::not_found("class not found"));
        }
    }
    let Some(student) = state.store.students.iter_mut().find(|s| s.id == student_id) else {
        return Err(HandlerErr::not_found("student not found"));
    };

    if let Some(v) = patch.get("firstName").and_then(|v| v.as_str()) {
        student.first_name = v.trim().to_string();
    }
    if let Some(v) = patch.get("lastName").and_then(|v| v.as_str()) {
        student.last_name = v.trim().to_string();
    }
    if let Some(v) = patch.get("classId").and_then(|v| v.as_str()) {
        student.class_id = v.to_string();
    }
    if let Some(v) = patch.get("guardianPhone").and_then(|v| v.as_str()) {
        student.guardian_phone = v.trim().to_string();
    }
    if let Some(v) = patch.get("active").and_then(|v| v.as_bool()) {
        student.active = v;
    }

    Ok(json!({ "updated": true }))
}

fn delete(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let student_id = get_required_str(params, "studentId")?;
    let Some(pos) = state.store.students.iter().position(|s| s.id == student_id) else {
        return Err(HandlerErr::not_found("student not found"));
    };
    // ID cards referencing the student keep their row; the holder renders blank.
    state.store.students.remove(pos);
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "students.list" => list(state, &req.params),
        "students.create" => create(state, &req.params),
        "students.update" => update(state, &req.params),
        "students.delete" => delete(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
