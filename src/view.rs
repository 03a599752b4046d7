use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Settle time the UI applies to the free-text search box before sending a
/// `*.list` request. Latency control only; the predicate below is pure and
/// gives the same answer with or without it.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// How long the UI shows the transient "Saved" confirmation before the
/// editable set settles back to idle.
pub const SAVED_CONFIRMATION_MS: u64 = 1500;

/// Visibility derived once at `session.login` and read-only afterwards.
///
/// `Teacher` carries the owned class-id set: the union of classes where the
/// teacher is the class-teacher and classes of subjects they teach. Anything
/// the login step could not recognize becomes `Denied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Admin,
    Teacher {
        teacher_id: String,
        class_ids: BTreeSet<String>,
    },
    Denied,
}

impl Scope {
    pub fn is_admin(&self) -> bool {
        matches!(self, Scope::Admin)
    }

    /// Rule for pages whose rows are keyed by a class id (students).
    pub fn class_rule(&self) -> AccessRule<'_> {
        match self {
            Scope::Admin => AccessRule::All,
            Scope::Teacher { class_ids, .. } => AccessRule::Member(class_ids),
            Scope::Denied => AccessRule::None,
        }
    }

    /// Rule for pages whose rows are keyed by a staff id (teachers, salary,
    /// attendance history).
    pub fn staff_rule(&self) -> AccessRule<'_> {
        match self {
            Scope::Admin => AccessRule::All,
            Scope::Teacher { teacher_id, .. } => AccessRule::One(teacher_id),
            Scope::Denied => AccessRule::None,
        }
    }
}

/// What the restrictor lets through for one page. Unrecognized scopes map to
/// `None`, which fails closed.
#[derive(Debug, Clone, Copy)]
pub enum AccessRule<'a> {
    All,
    Member(&'a BTreeSet<String>),
    One(&'a str),
    None,
}

/// Applies the role rule before any user-driven filtering. Records whose key
/// extractor yields nothing are dropped under a restricted rule: a row that
/// cannot prove ownership is not shown.
pub fn restrict<'a, T, F>(records: &'a [T], rule: AccessRule<'_>, key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    match rule {
        AccessRule::All => records.iter().collect(),
        AccessRule::Member(allowed) => records
            .iter()
            .filter(|r| key(r).map(|k| allowed.contains(k)).unwrap_or(false))
            .collect(),
        AccessRule::One(id) => records.iter().filter(|r| key(r) == Some(id)).collect(),
        AccessRule::None => Vec::new(),
    }
}

/// Case-insensitive substring match over a page's searchable fields. An empty
/// or whitespace-only query matches everything.
pub fn text_matches(query: &str, fields: &[&str]) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&q))
}

/// Categorical filter selection. `""` and `"all"` (any case) mean the filter
/// is unconstrained.
pub fn categorical(selected: &str) -> Option<&str> {
    let t = selected.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// The page actually served, after out-of-range recovery.
    pub page: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Slices the filtered sequence into one fixed-size page.
///
/// A requested page beyond the end of a non-empty set resolves to page 1
/// rather than serving an empty page; the resolved page is echoed in the
/// meta so the UI can sync its pager. An empty set reports zero pages.
pub fn paginate<'a, T>(filtered: &'a [T], page: usize, page_size: usize) -> (&'a [T], PageMeta) {
    let total_count = filtered.len();
    let total_pages = if total_count == 0 {
        0
    } else {
        (total_count + page_size - 1) / page_size
    };
    let requested = page.max(1);
    let page = if requested <= total_pages { requested } else { 1 };
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_count);
    let items = if start >= total_count {
        &filtered[0..0]
    } else {
        &filtered[start..end]
    };
    (
        items,
        PageMeta {
            page,
            total_count,
            total_pages,
        },
    )
}

/// Per-category count plus an optional summed amount, for summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub count: usize,
    pub total: f64,
}

/// Counts records per category, seeded with the exhaustive category list so
/// zero-count categories still appear on the summary cards.
pub fn count_by_seeded<T, K, F>(records: &[&T], categories: &[K], key: F) -> BTreeMap<K, usize>
where
    K: Ord + Clone,
    F: Fn(&T) -> K,
{
    let mut out: BTreeMap<K, usize> = categories.iter().map(|c| (c.clone(), 0)).collect();
    for r in records {
        *out.entry(key(r)).or_insert(0) += 1;
    }
    out
}

/// Integer percentage, `round(part/total*100)`. A zero total yields 0.
pub fn percent(part: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as i64
}
