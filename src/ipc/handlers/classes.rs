use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::require_session;
use crate::ipc::types::{AppState, Request};
use crate::view;

/// Class options for the dashboard filters, with enough counts to double as
/// the classes card. Not paginated; a school has a handful of classes.
fn list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let store = &state.store;
    let scoped = view::restrict(&store.classes, session.scope.class_rule(), |c| {
        Some(c.id.as_str())
    });

    let rows: Vec<serde_json::Value> = scoped
        .iter()
        .map(|c| {
            let student_count = store.students.iter().filter(|s| s.class_id == c.id).count();
            let subjects: Vec<serde_json::Value> = store
                .subjects
                .iter()
                .filter(|s| s.class_id == c.id)
                .map(|s| {
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "teacherName": store.teacher_name(&s.teacher_id),
                    })
                })
                .collect();
            json!({
                "id": c.id,
                "name": c.name,
                "grade": c.grade,
                "classTeacherId": c.class_teacher_id,
                "classTeacherName": store.teacher_name(&c.class_teacher_id),
                "studentCount": student_count,
                "subjects": subjects,
            })
        })
        .collect();

    Ok(json!({ "classes": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "classes.list" => list(state),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
