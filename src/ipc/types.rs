use serde::Deserialize;

use crate::editable::EditableSet;
use crate::model::{AttendanceStatus, PayDraft};
use crate::store::Store;
use crate::view::Scope;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The scope resolved at login, immutable until the next login.
pub struct Session {
    pub role: String,
    pub scope: Scope,
}

pub struct AppState {
    pub store: Store,
    pub session: Option<Session>,
    /// Staged attendance marking for one date, when a date is open.
    pub attendance_draft: Option<EditableSet<AttendanceStatus>>,
    /// Staged payroll run for one month, when a month is open.
    pub payroll_draft: Option<EditableSet<PayDraft>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            session: None,
            attendance_draft: None,
            payroll_draft: None,
        }
    }
}
