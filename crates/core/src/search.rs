//! Catalog search and genre matching.
//!
//! Search is a case-insensitive substring match against a listing's title or
//! genre. The in-memory store calls [`matches_listing`] directly; the Postgres
//! store builds an `ILIKE` pattern with [`like_pattern`] so both agree.

/// Character used to escape `LIKE` wildcards in [`escape_like`].
pub const LIKE_ESCAPE: char = '\\';

/// Normalize a raw `?q=` value.
///
/// Returns `None` when the query is absent or blank, which callers treat as
/// "match everything" (the empty substring is contained in every string).
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Case-insensitive substring test against title or genre.
pub fn matches_listing(title: &str, genre: &str, query: &str) -> bool {
    let needle = query.to_lowercase();
    title.to_lowercase().contains(&needle) || genre.to_lowercase().contains(&needle)
}

/// Case-insensitive exact comparison of two genre labels (surrounding
/// whitespace ignored).
pub fn genre_matches(label: &str, genre: &str) -> bool {
    label.trim().to_lowercase() == genre.trim().to_lowercase()
}

/// Escape `%`, `_` and the escape character itself so user input is matched
/// literally inside a `LIKE` / `ILIKE` pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Build a `%term%` substring pattern with wildcards in `term` escaped.
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
