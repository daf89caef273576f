//! Navigation (URL) state adapter.
//!
//! The session reads `(query, page)` from the navigator as input and emits
//! replace requests as output; it never assumes which mechanism performs the
//! write.

/// Query parameter carrying the search text.
pub const QUERY_PARAM: &str = "q";

/// Query parameter carrying the 1-based page.
pub const PAGE_PARAM: &str = "page";

/// Observable navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationState {
    pub query: String,
    pub page: u32,
}

impl NavigationState {
    /// Build a state, trimming the query and clamping the page to at least 1.
    pub fn new(query: impl AsRef<str>, page: u32) -> Self {
        Self {
            query: query.as_ref().trim().to_string(),
            page: page.max(1),
        }
    }

    /// Interpret raw `q`/`page` parameter values.
    ///
    /// A missing or blank query falls back to `default_query`. The page is
    /// read from its leading integer, clamped to at least 1, and falls back
    /// to 1 when nothing parses.
    pub fn from_params(query: Option<&str>, page: Option<&str>, default_query: &str) -> Self {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| default_query.trim());
        let page = page.and_then(parse_leading_int).unwrap_or(1);
        Self::new(query, clamp_page(page))
    }

    /// `(name, value)` pairs to write back into the URL.
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [
            (QUERY_PARAM, self.query.clone()),
            (PAGE_PARAM, self.page.to_string()),
        ]
    }
}

impl std::fmt::Display for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{QUERY_PARAM}={:?} {PAGE_PARAM}={}", self.query, self.page)
    }
}

/// External navigation state: read the current `(query, page)` and replace
/// it without resetting scroll or focus.
pub trait Navigator: Send + Sync {
    fn current(&self) -> NavigationState;
    fn replace(&self, state: &NavigationState);
}

fn clamp_page(page: i64) -> u32 {
    u32::try_from(page.max(1)).unwrap_or(u32::MAX)
}

/// Parse an optional sign followed by leading digits, ignoring the rest.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
