use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_page, get_required_str, get_str, require_admin};
use crate::ipc::types::{AppState, Request};
use crate::model::Book;
use crate::view;

const PAGE_SIZE: usize = 10;

fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let query = get_str(params, "query");
    let category_raw = get_str(params, "category");
    let page = get_page(params);

    let category_sel = view::categorical(&category_raw);
    let filtered: Vec<&Book> = state
        .store
        .books
        .iter()
        .filter(|b| {
            view::text_matches(
                &query,
                &[b.title.as_str(), b.author.as_str(), b.isbn.as_str()],
            ) && category_sel.map_or(true, |c| b.category.eq_ignore_ascii_case(c))
        })
        .collect();

    let (items, meta) = view::paginate(&filtered, page, PAGE_SIZE);
    let total_copies: i64 = filtered.iter().map(|b| b.total_copies).sum();
    let issued: i64 = filtered.iter().map(|b| b.issued_copies).sum();
    let rows: Vec<serde_json::Value> = items
        .iter()
        .map(|b| {
            json!({
                "id": b.id,
                "title": b.title,
                "author": b.author,
                "isbn": b.isbn,
                "category": b.category,
                "totalCopies": b.total_copies,
                "issuedCopies": b.issued_copies,
                "availableCopies": b.total_copies - b.issued_copies,
            })
        })
        .collect();

    Ok(json!({
        "items": rows,
        "page": meta.page,
        "totalCount": meta.total_count,
        "totalPages": meta.total_pages,
        "summary": {
            "titles": filtered.len(),
            "totalCopies": total_copies,
            "issued": issued,
            "available": total_copies - issued,
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
    let author = get_required_str(params, "author")?.trim().to_string();
    let isbn = get_str(params, "isbn");
    let category = get_required_str(params, "category")?.trim().to_string();
    let total_copies = params
        .get("totalCopies")
        .and_then(|v| v.as_i64())
        .unwrap_or(1);
    if total_copies < 1 {
        return Err(HandlerErr::bad_params("totalCopies must be at least 1"));
    }

    let book_id = Uuid::new_v4().to_string();
    state.store.books.push(Book {
        id: book_id.clone(),
        title,
        author,
        isbn,
        category,
        total_copies,
        issued_copies: 0,
    });

    Ok(json!({ "bookId": book_id }))
}

fn issue(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let book_id = get_required_str(params, "bookId")?;
    let Some(book) = state.store.books.iter_mut().find(|b| b.id == book_id) else {
        return Err(HandlerErr::not_found("book not found"));
    };
    if book.issued_copies >= book.total_copies {
        return Err(HandlerErr::new("no_copies", "no copies available to issue"));
    }
    book.issued_copies += 1;
    Ok(json!({
        "bookId": book.id,
        "issuedCopies": book.issued_copies,
        "availableCopies": book.total_copies - book.issued_copies,
    }))
}

fn give_back(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    require_admin(state)?;
    let book_id = get_required_str(params, "bookId")?;
    let Some(book) = state.store.books.iter_mut().find(|b| b.id == book_id) else {
        return Err(HandlerErr::not_found("book not found"));
    };
    if book.issued_copies == 0 {
        return Err(HandlerErr::new("not_issued", "no copies are out on loan"));
    }
    book.issued_copies -= 1;
    Ok(json!({
        "bookId": book.id,
        "issuedCopies": book.issued_copies,
        "availableCopies": book.total_copies - book.issued_copies,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let out = match req.method.as_str() {
        "books.list" => list(state, &req.params),
        "books.create" => create(state, &req.params),
        "books.issue" => issue(state, &req.params),
        "books.return" => give_back(state, &req.params),
        _ => return None,
    };
    Some(respond(out, &req.id))
}
