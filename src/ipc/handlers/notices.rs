use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    get_bool, get_page, get_required_str, get_str, parse_date_key, require_admin, require_session,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{Audience, Notice};
use crate::view::{self, Scope};

const PAGE_SIZE: usize = 10;

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = require_session(state)?;
    let query = get_str(params, "query");
    let audience_raw = get_str(params, "audience");
    let page = get_page(params);

    // Audience targeting: teachers never see student-only circulars. Denied
    // scopes see nothing, same as every other page.
    let visible: Vec<&Notice> = match &session.scope {
        Scope::Admin => state.store.notices.iter().collect(),
        Scope::Teacher { .. } => state
            .store
            .notices
            .iter()
            .filter(|n| n.audience != Audience::Students)
            .collect(),
        Scope::Denied => Vec::new(),
    };

    let audience_sel = view::categorical(&audience_raw);
    let mut filtered: Vec<&Notice> = visible
        .into_iter()
        .filter(|n| {
            view::text_matches(&query, &[n.title.as_str(), n.body.as_str()])
                && audience_sel.map_or(true, |v| Audience::parse(v) == Some(n.audience))
        })
        .collect();
    // Pinned first, then newest; id as the tie-break keeps paging stable.
    filtered.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then(b.posted_on.cmp(&a.posted_on))
            .then(a.id.cmp(&b.id))
    });

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let pinned = filtered.iter().filter(|n| n.pinned).count();
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "title": n.title,
                "body": n.body,
                "audience": n.audience,
                "postedOn": n.posted_on,
                "pinned": n.pinned,
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
            "pinned": pinned,
        }
    }))
}

fn create(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let title = get_required_str(params, "title")?.trim().to_string();
    if title.is_empty() {
        return Err(HandlerErr::bad_params("title must not be empty"));
    }
    let body = get_required_str(params, "body")?.trim().to_string();
    let audience = match params.get("audience").and_then(|v| v.as_str()) {
        Some(raw) => {
            Audience::parse(raw).ok_or_else(|| HandlerErr::bad_params("unknown audience"))?
        }
        None => Audience::All,
    };
    let posted_on = match params.get("postedOn").and_then(|v| v.as_str()) {
        Some(raw) => parse_date_key(raw)?,
        None => Utc::now().date_naive().to_string(),
    };

    let notice_id = Uuid::new_v4().to_string();
    state.store.notices.push(Notice {
        id: notice_id.clone(),
        title,
        body,
        audience,
        posted_on,
        pinned: get_bool(params, "pinned").unwrap_or(false),
    });

    Ok(json!({ "noticeId": notice_id }))
}

fn delete(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let notice_id = get_required_str(params, "noticeId")?;
    let Some(pos) = state.store.notices.iter().position(|n| n.id == notice_id) else {
        return Err(HandlerErr::not_found("notice not found"));
    };
    state.store.notices.remove(pos);
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "notices.list" => list(state, &req.params),
        "notices.create" => create(state, &req.params),
        "notices.delete" => delete(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
