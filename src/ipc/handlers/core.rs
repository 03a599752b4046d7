use serde_json::json;

use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request, Session};
use crate::view::{Scope, SAVED_CONFIRMATION_MS, SEARCH_DEBOUNCE_MS};

fn health(state: &AppState) -> serde_json::Value {
    json!({
        "version": env!("CARGO_PKG_VERSION"),
        "role": state.session.as_ref().map(|s| s.role.clone()),
        "searchDebounceMs": SEARCH_DEBOUNCE_MS,
        "savedConfirmationMs": SAVED_CONFIRMATION_MS,
    })
}

fn session_login(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let role = get_required_str(params, "role")?.trim().to_ascii_lowercase();
    let scope = match role.as_str() {
        "admin" => Scope::Admin,
        "teacher" => {
            let teacher_id = get_required_str(params, "teacherId")?;
            if state.store.teacher(&teacher_id).is_none() {
                return Err(HandlerErr::not_found("teacher not found"));
            }
            let class_ids = state.store.owned_class_ids(&teacher_id);
            Scope::Teacher {
                teacher_id,
                class_ids,
            }
        }
        // Unknown roles still get a session, but one that sees nothing.
        _ => {
            tracing::warn!(role = role.as_str(), "unrecognized role, scope denied");
            Scope::Denied
        }
    };

    // A new scope invalidates any staged edits.
    state.attendance_draft = None;
    state.payroll_draft = None;

    let scope_json = match &scope {
        Scope::Admin => json!({ "kind": "admin" }),
        Scope::Teacher {
            teacher_id,
            class_ids,
        } => json!({
            "kind": "teacher",
            "teacherId": teacher_id,
            "ownedClassIds": class_ids.iter().collect::<Vec<_>>(),
        }),
        Scope::Denied => json!({ "kind": "denied" }),
    };
    state.session = Some(Session {
        role: role.clone(),
        scope,
    });
    tracing::info!(role = role.as_str(), "session started");

    Ok(json!({ "role": role, "scope": scope_json }))
}

fn session_logout(state: &mut AppState) -> serde_json::Value {
    state.session = None;
    state.attendance_draft = None;
    state.payroll_draft = None;
    json!({ "loggedOut": true })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(ok(&req.id, health(state))),
        "session.login" => Some(respond(session_login(state, &req.params), &req.id)),
        "session.logout" => Some(ok(&req.id, session_logout(state))),
        _ => None,
    }
}
