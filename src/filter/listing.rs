//! Page / limit / search normalization for every listing endpoint.
//!
//! Malformed input never rejects a request: it degrades to the defaults.

use serde::Serialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 2;

// Page and limit are parsed as 30-bit unsigned integers; wider values fall back to the default.
const MAX_PARAM: u64 = (1 << 30) - 1;

/// Raw query string parameters, exactly as the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListingQuery {
    /// Collects the listing parameters from decoded query pairs. The first
    /// occurrence of a repeated key wins and unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "search" => &mut query.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// Normalized listing request. `page` and `limit` are always >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
        }
    }
}

impl Listing {
    pub fn parse(raw_page: Option<&str>, raw_limit: Option<&str>, raw_search: Option<&str>) -> Self {
        Self {
            page: parse_positive(raw_page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(raw_limit).unwrap_or(DEFAULT_LIMIT),
            search: raw_search.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    pub fn new(page: u64, limit: u64) -> Self {
        Self::parse(Some(&page.to_string()), Some(&limit.to_string()), None)
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    /// Number of matching rows skipped before the window starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Case-insensitive substring match of the search text against `field`.
    /// Always true when no search was given.
    pub fn matches(&self, field: &str) -> bool {
        match &self.search {
            Some(needle) => field.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }

    /// `ILIKE` pattern for the search text with `%`, `_` and `\` escaped so the
    /// text is matched literally.
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|needle| {
            let mut escaped = String::with_capacity(needle.len() + 2);
            escaped.push('%');
            for c in needle.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            escaped
        })
    }

    /// Applies the `[offset, offset + limit)` window to an already filtered,
    /// already ordered sequence.
    pub fn window<T>(&self, rows: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        rows.into_iter().skip(skip).take(take).collect()
    }
}

impl From<ListingQuery> for Listing {
    fn from(query: ListingQuery) -> Self {
        Listing::parse(query.page.as_deref(), query.limit.as_deref(), query.search.as_deref())
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.parse::<u64>().ok())
        .filter(|v| (1..=MAX_PARAM).contains(v))
}
