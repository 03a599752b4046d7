use chrono::Utc;
use serde_json::json;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_page, get_required_str, get_str, require_admin};
use crate::ipc::types::{AppState, Request};
use crate::model::{CardStatus, HolderType, IdCard};
use crate::view;

const PAGE_SIZE: usize = 10;

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let query = get_str(params, "query");
    let holder_raw = get_str(params, "holderType");
    let status_raw = get_str(params, "status");
    let page = get_page(params);

    let holder_sel = view::categorical(&holder_raw);
    let status_sel = view::categorical(&status_raw);
    let store = &state.store;
    let filtered: Vec<&IdCard> = store
        .id_cards
        .iter()
        .filter(|c| {
            let holder = store.holder_name(c.holder_type, &c.holder_id);
            view::text_matches(&query, &[holder.as_str(), c.holder_id.as_str()])
                && holder_sel.map_or(true, |v| HolderType::parse(v) == Some(c.holder_type))
                && status_sel.map_or(true, |v| CardStatus::parse(v) == Some(c.status))
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let mut pending = 0usize;
    let mut issued = 0usize;
    let mut lost = 0usize;
    for c in &filtered {
        match c.status {
            CardStatus::Pending => pending += 1,
            CardStatus::Issued => issued += 1,
            CardStatus::Lost => lost += 1,
        }
    }
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "holderType": c.holder_type,
                "holderId": c.holder_id,
                "holderName": store.holder_name(c.holder_type, &c.holder_id),
                "issuedOn": c.issued_on,
                "status": c.status,
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
            "pending": pending,
            "issued": issued,
            "lost": lost,
        }
    }))
}

fn update_status(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let card_id = get_required_str(params, "cardId")?;
    let status = CardStatus::parse(&get_required_str(params, "status")?)
        .ok_or_else(|| HandlerErr::bad_params("unknown card status"))?;
    let Some(card) = state.store.id_cards.iter_mut().find(|c| c.id == card_id) else {
        return Err(HandlerErr::not_found("card not found"));
    };
    card.status = status;
    // First transition to issued stamps the issue date.
    if status == CardStatus::Issued && card.issued_on.is_none() {
        card.issued_on = Some(Utc::now().date_naive().to_string());
    }
    Ok(json!({
        "cardId": card.id,
        "status": card.status,
        "issuedOn": card.issued_on,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "idCards.list" => list(state, &req.params),
        "idCards.updateStatus" => update_status(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
