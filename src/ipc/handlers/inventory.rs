use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_page, get_required_str, get_str, require_admin};
use crate::ipc::types::{AppState, Request};
use crate::model::{InventoryItem, ItemCondition};
use crate::view;

const PAGE_SIZE: usize = 10;

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let query = get_str(params, "query");
    let category_raw = get_str(params, "category");
    let condition_raw = get_str(params, "condition");
    let page = get_page(params);

    let category_sel = view::categorical(&category_raw);
    let condition_sel = view::categorical(&condition_raw);
    let filtered: Vec<&InventoryItem> = state
        .store
        .inventory
        .iter()
        .filter(|i| {
            view::text_matches(&query, &[i.name.as_str(), i.category.as_str()])
                && category_sel.map_or(true, |c| i.category.eq_ignore_ascii_case(c))
                && condition_sel.map_or(true, |v| ItemCondition::parse(v) == Some(i.condition))
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let mut good = 0usize;
    let mut repair = 0usize;
    let mut written_off = 0usize;
    let mut total_value = 0.0f64;
    for i in &filtered {
        match i.condition {
            ItemCondition::Good => good += 1,
            ItemCondition::Repair => repair += 1,
            ItemCondition::WrittenOff => written_off += 1,
        }
        total_value += i.quantity as f64 * i.unit_price;
    }
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|i| {
            json!({
                "id": i.id,
                "name": i.name,
                "category": i.category,
                "quantity": i.quantity,
                "unitPrice": i.unit_price,
                "condition": i.condition,
            })
        })
        .collect();

    Ok(json!({
        "items": rows,
        "page": meta.page,
        "totalCount": meta.total_count,
        "totalPages": meta.total_pages,
        "summary": {
            "itemCount": filtered.len(),
            "good": good,
            "repair": repair,
            "writtenoff": written_off,
            "totalValue": total_value,
        }
    }))
}

fn create(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let name = get_required_str(params, "name")?.trim().to_string();
    if name.is_empty() {
        return Err(HandlerErr::bad_params("name must not be empty"));
    }
    let category = get_required_str(params, "category")?.trim().to_string();
    let quantity = params
        .get("quantity")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::bad_params("missing quantity"))?;
    if quantity < 0 {
        return Err(HandlerErr::bad_params("quantity must not be negative"));
    }
    let unit_price = params
        .get("unitPrice")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params("missing unitPrice"))?;
    let condition = match params.get("condition").and_then(|v| v.as_str()) {
        Some(raw) => ItemCondition::parse(raw)
            .ok_or_else(|| HandlerErr::bad_params("unknown condition"))?,
        None => ItemCondition::Good,
    };

    let item_id = Uuid::new_v4().to_string();
    state.store.inventory.push(InventoryItem {
        id: item_id.clone(),
        name,
        category,
        quantity,
        unit_price,
        condition,
    });

    Ok(json!({ "itemId": item_id }))
}

fn update(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let item_id = get_required_str(params, "itemId")?;
    let patch = params.get("patch").cloned().unwrap_or_else(|| json!({}));

    let Some(item) = state.store.inventory.iter_mut().find(|i| i.id == item_id) else {
        return Err(HandlerErr::not_found("item not found"));
    };

    if let Some(v) = patch.get("name").and_then(|v| v.as_str()) {
        item.name = v.trim().to_string();
    }
    if let Some(v) = patch.get("category").and_then(|v| v.as_str()) {
        item.category = v.trim().to_string();
    }
    if let Some(v) = patch.get("quantity").and_then(|v| v.as_i64()) {
        if v < 0 {
            return Err(HandlerErr::bad_params("quantity must not be negative"));
        }
        item.quantity = v;
    }
    if let Some(v) = patch.get("unitPrice").and_then(|v| v.as_f64()) {
        item.unit_price = v;
    }
    if let Some(raw) = patch.get("condition").and_then(|v| v.as_str()) {
        item.condition = ItemCondition::parse(raw)
            .ok_or_else(|| HandlerErr::bad_params("unknown condition"))?;
    }

    Ok(json!({ "updated": true }))
}

fn delete(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let item_id = get_required_str(params, "itemId")?;
    let Some(pos) = state.store.inventory.iter().position(|i| i.id == item_id) else {
        return Err(HandlerErr::not_found("item not found"));
    };
    state.store.inventory.remove(pos);
    Ok(json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "inventory.list" => list(state, &req.params),
        "inventory.create" => create(state, &req.params),
        "inventory.update" => update(state, &req.params),
        "inventory.delete" => delete(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
