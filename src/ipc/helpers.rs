use chrono::NaiveDate;

use crate::ipc::error::HandlerErr;
use crate::ipc::types::{AppState, Session};

pub fn get_str(params: &serde_json::Value, key: &str) -> String {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_bool(params: &serde_json::Value, key: &str) -> Option<bool> {
    params.get(key).and_then(|v| v.as_bool())
}

/// Page number from params; absent or malformed means page 1.
pub fn get_page(params: &serde_json::Value) -> usize {
    params
        .get("page")
        .and_then(|v| v.as_u64())
        .map(|p| p as usize)
        .unwrap_or(1)
        .max(1)
}

pub fn require_session(state: &AppState) -> Result<&Session, HandlerErr> {
    state
        .session
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_session", "log in first"))
}

pub fn require_admin(state: &AppState) -> Result<&Session, HandlerErr> {
    let session = require_session(state)?;
    if !session.scope.is_admin() {
        return Err(HandlerErr::new(
            "forbidden",
            "this page requires the admin role",
        ));
    }
    Ok(session)
}

/// `YYYY-MM-DD`, validated by parsing.
pub fn parse_date_key(raw: &str) -> Result<String, HandlerErr> {
    let t = raw.trim();
    match NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        Ok(_) => Ok(t.to_string()),
        Err(_) => Err(HandlerErr::bad_params("date must be YYYY-MM-DD")),
    }
}

/// `YYYY-MM`, normalized with a zero-padded month.
pub fn parse_month_key(raw: &str) -> Result<String, HandlerErr> {
    let t = raw.trim();
    let Some((y, m)) = t.split_once('-') else {
        return Err(HandlerErr::bad_params("month must be YYYY-MM"));
    };
    let year = y
        .parse::<i32>()
        .map_err(|_| HandlerErr::bad_params("month year must be numeric"))?;
    let month = m
        .parse::<u32>()
        .map_err(|_| HandlerErr::bad_params("month must be YYYY-MM"))?;
    if !(1..=12).contains(&month) {
        return Err(HandlerErr::bad_params("month must be between 01 and 12"));
    }
    Ok(format!("{:04}-{:02}", year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_keys_normalize_and_reject_garbage() {
        assert_eq!(parse_month_key("2025-7").unwrap(), "2025-07");
        assert_eq!(parse_month_key(" 2025-12 ").unwrap(), "2025-12");
        assert!(parse_month_key("2025").is_err());
        assert!(parse_month_key("2025-13").is_err());
        assert!(parse_month_key("july").is_err());
    }

    #[test]
    fn date_keys_must_parse() {
        assert_eq!(parse_date_key("2025-07-01").unwrap(), "2025-07-01");
        assert!(parse_date_key("2025-02-30").is_err());
        assert!(parse_date_key("01/07/2025").is_err());
    }
}
