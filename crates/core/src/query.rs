//! Listing filters, pagination and ordering.
//!
//! Raw query-string options ([`ContentQuery`]) are compiled once into a
//! [`QueryPlan`]. The same plan drives the in-process predicate used by the
//! memory store and the SQL built by the Postgres store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::content::{ContentRecord, ContentStatus, ContentType, Platform, UpdateType};
use crate::types::ContentId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default page size for content listings.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for content listings.
pub const MAX_LIMIT: i64 = 100;

/// Highest page number honoured; larger requests land on this page.
pub const MAX_PAGE: i64 = 1_000_000;

/// Keyword meaning "no filter" for enumerated options.
const ALL: &str = "all";

/// Keyword selecting top-level resources in `parentId`.
const ROOT: &str = "root";

// ---------------------------------------------------------------------------
// Raw options
// ---------------------------------------------------------------------------

/// Listing options as they arrive from the query string.
///
/// Everything is a string so that malformed values can be ignored instead of
/// failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentQuery {
    pub status: Option<String>,
    #[serde(alias = "contentType")]
    pub content_type: Option<String>,
    pub platform: Option<String>,
    #[serde(alias = "updateType")]
    pub update_type: Option<String>,
    #[serde(alias = "parentId")]
    pub parent_id: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

// ---------------------------------------------------------------------------
// Compiled plan
// ---------------------------------------------------------------------------

/// Which side of the trash a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Active,
    Trashed,
}

/// Hierarchy constraint for resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFilter {
    /// Resources without a parent.
    Root,
    /// Direct children of the given resource.
    Child(ContentId),
}

/// A compiled, validated filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    pub scope: Scope,
    pub status: Option<ContentStatus>,
    pub content_type: Option<ContentType>,
    pub platform: Option<Platform>,
    pub update_type: Option<UpdateType>,
    pub parent: Option<ParentFilter>,
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
}

/// Requested page, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub filter: ContentFilter,
    pub window: PageWindow,
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

/// One page of a content listing.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPage {
    pub content: Vec<ContentRecord>,
    pub pagination: Pagination,
}

// ---------------------------------------------------------------------------
// Clamping helpers
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided page number to `[1, MAX_PAGE]`.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Parse an enumerated option, treating blank, `all` and unknown as absent.
fn parse_choice<T>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
        return None;
    }
    parse(raw)
}

fn parse_parent(raw: Option<&str>) -> Option<ParentFilter> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case(ROOT) {
        return Some(ParentFilter::Root);
    }
    ContentId::parse_str(raw).ok().map(ParentFilter::Child)
}

// ---------------------------------------------------------------------------
// Plan construction
// ---------------------------------------------------------------------------

impl ContentQuery {
    /// Compile into a plan over active records.
    pub fn plan(&self) -> QueryPlan {
        let filter = ContentFilter {
            scope: Scope::Active,
            status: parse_choice(self.status.as_deref(), ContentStatus::parse),
            content_type: parse_choice(self.content_type.as_deref(), ContentType::parse),
            platform: parse_choice(self.platform.as_deref(), Platform::parse),
            update_type: parse_choice(self.update_type.as_deref(), UpdateType::parse),
            parent: parse_parent(self.parent_id.as_deref()),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        let window = PageWindow {
            page: clamp_page(parse_number(self.page.as_deref())),
            limit: clamp_limit(parse_number(self.limit.as_deref()), DEFAULT_LIMIT, MAX_LIMIT),
        };
        QueryPlan { filter, window }
    }
}

impl ContentFilter {
    /// Match every active record.
    pub fn active() -> Self {
        Self {
            scope: Scope::Active,
            status: None,
            content_type: None,
            platform: None,
            update_type: None,
            parent: None,
            search: None,
        }
    }

    /// Match every trashed record, optionally of one content type.
    pub fn trashed(content_type: Option<ContentType>) -> Self {
        Self {
            scope: Scope::Trashed,
            content_type,
            ..Self::active()
        }
    }

    /// Whether `record` satisfies every constraint of this filter.
    pub fn matches(&self, record: &ContentRecord) -> bool {
        let in_scope = match self.scope {
            Scope::Active => !record.is_trashed(),
            Scope::Trashed => record.is_trashed(),
        };
        if !in_scope {
            return false;
        }
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.content_type.is_some_and(|t| t != record.content_type()) {
            return false;
        }
        if self.platform.is_some() && self.platform != record.variant.platform() {
            return false;
        }
        if self.update_type.is_some() && self.update_type != record.variant.update_type() {
            return false;
        }
        if let Some(parent) = self.parent {
            if record.content_type() != ContentType::Resource {
                return false;
            }
            let ok = match parent {
                ParentFilter::Root => record.variant.parent_id().is_none(),
                ParentFilter::Child(id) => record.variant.parent_id() == Some(id),
            };
            if !ok {
                return false;
            }
        }
        if let Some(term) = &self.search {
            return search_matches(record, term);
        }
        true
    }

    /// Ordering the store must return results in.
    pub fn compare(&self, a: &ContentRecord, b: &ContentRecord) -> Ordering {
        match self.scope {
            Scope::Active => listing_order(a, b),
            Scope::Trashed => trash_order(a, b),
        }
    }
}

/// Case-insensitive substring match over title, body, summary and excerpt.
fn search_matches(record: &ContentRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    let haystacks = [
        Some(record.title.as_str()),
        record.variant.body(),
        record.variant.summary(),
        record.variant.excerpt(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&needle))
}

/// `published_at DESC NULLS LAST, created_at DESC, id DESC`.
pub fn listing_order(a: &ContentRecord, b: &ContentRecord) -> Ordering {
    let published = match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    published
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Most recently trashed first.
pub fn trash_order(a: &ContentRecord, b: &ContentRecord) -> Ordering {
    b.deleted_at
        .cmp(&a.deleted_at)
        .then_with(|| b.id.cmp(&a.id))
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(0))
    }

    pub fn pagination(&self, total: i64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: (total + self.limit - 1) / self.limit,
        }
    }
}

/// Turn a search term into an `ILIKE` pattern, escaping the wildcards.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Author, NewContent};
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn query(value: serde_json::Value) -> ContentQuery {
        serde_json::from_value(value).unwrap()
    }

    fn record(value: serde_json::Value) -> ContentRecord {
        let input: NewContent = serde_json::from_value(value).unwrap();
        let author = Author {
            id: "u1".into(),
            name: "Editor".into(),
            email: None,
        };
        ContentRecord::new(ContentId::now_v7(), input, author, Utc::now()).unwrap()
    }

    // -- plan ----------------------------------------------------------------

    #[test]
    fn defaults_are_first_page_of_ten() {
        let plan = ContentQuery::default().plan();
        assert_eq!(plan.window, PageWindow { page: 1, limit: 10 });
        assert_eq!(plan.filter, ContentFilter::active());
    }

    #[test]
    fn all_and_unknown_values_are_ignored() {
        let plan = query(json!({
            "status": "all",
            "contentType": "podcast",
            "platform": "",
            "parentId": "not-a-uuid",
            "search": "   "
        }))
        .plan();
        assert_eq!(plan.filter, ContentFilter::active());
    }

    #[test]
    fn snake_and_camel_case_are_accepted() {
        let camel = query(json!({"contentType": "update", "updateType": "fix"})).plan();
        let snake = query(json!({"content_type": "update", "update_type": "fix"})).plan();
        assert_eq!(camel, snake);
        assert_eq!(camel.filter.content_type, Some(ContentType::Update));
        assert_eq!(camel.filter.update_type, Some(UpdateType::Fix));
    }

    #[test]
    fn limit_and_page_are_clamped() {
        let plan = query(json!({"page": "0", "limit": "500"})).plan();
        assert_eq!(plan.window, PageWindow { page: 1, limit: 100 });

        let plan = query(json!({"page": "-3", "limit": "0"})).plan();
        assert_eq!(plan.window, PageWindow { page: 1, limit: 1 });

        let plan = query(json!({"page": "abc", "limit": "xyz"})).plan();
        assert_eq!(plan.window, PageWindow { page: 1, limit: 10 });
    }

    #[test]
    fn huge_page_is_capped_and_offset_stays_positive() {
        let plan = query(json!({"page": i64::MAX.to_string(), "limit": "100"})).plan();
        assert_eq!(plan.window.page, MAX_PAGE);
        assert_eq!(plan.window.offset(), (MAX_PAGE - 1) * 100);

        let raw = PageWindow { page: i64::MAX, limit: i64::MAX };
        assert_eq!(raw.offset(), i64::MAX);
    }

    #[test]
    fn parent_root_and_uuid() {
        assert_eq!(
            query(json!({"parentId": "root"})).plan().filter.parent,
            Some(ParentFilter::Root)
        );
        let id = ContentId::now_v7();
        assert_eq!(
            query(json!({"parentId": id.to_string()})).plan().filter.parent,
            Some(ParentFilter::Child(id))
        );
    }

    // -- pagination ----------------------------------------------------------

    #[test]
    fn pages_round_up() {
        let window = PageWindow { page: 3, limit: 10 };
        assert_eq!(window.offset(), 20);
        assert_eq!(window.pagination(25).pages, 3);
        assert_eq!(window.pagination(30).pages, 3);
        assert_eq!(window.pagination(0).pages, 0);
    }

    // -- matches -------------------------------------------------------------

    #[test]
    fn search_covers_body_summary_and_excerpt() {
        let post = record(json!({"title": "A", "content_type": "post", "excerpt": "Rust Tips"}));
        let update =
            record(json!({"title": "B", "content_type": "update", "summary": "Faster RUST builds"}));
        let press = record(json!({"title": "C", "content_type": "press", "body": "Nothing here"}));

        let filter = query(json!({"search": "rust"})).plan().filter;
        assert!(filter.matches(&post));
        assert!(filter.matches(&update));
        assert!(!filter.matches(&press));
    }

    #[test]
    fn parent_filter_only_matches_resources() {
        let root = record(json!({"title": "Docs", "content_type": "resource"}));
        let post = record(json!({"title": "Blog", "content_type": "post"}));
        let filter = query(json!({"parentId": "root"})).plan().filter;
        assert!(filter.matches(&root));
        assert!(!filter.matches(&post));
    }

    #[test]
    fn platform_filter_matches_feed_only() {
        let feed = record(json!({"title": "Clip", "content_type": "feed", "platform": "youtube"}));
        let other = record(json!({"title": "Post", "content_type": "post"}));
        let filter = query(json!({"platform": "youtube"})).plan().filter;
        assert!(filter.matches(&feed));
        assert!(!filter.matches(&other));
    }

    #[test]
    fn scope_separates_active_and_trashed() {
        let mut item = record(json!({"title": "Gone", "content_type": "post"}));
        assert!(ContentFilter::active().matches(&item));
        item.deleted_at = Some(Utc::now());
        assert!(!ContentFilter::active().matches(&item));
        assert!(ContentFilter::trashed(None).matches(&item));
        assert!(!ContentFilter::trashed(Some(ContentType::Press)).matches(&item));
    }

    // -- ordering ------------------------------------------------------------

    #[test]
    fn published_first_then_newest_created() {
        let now = Utc::now();
        let mut older_published = record(json!({"title": "A", "content_type": "post"}));
        older_published.published_at = Some(now - Duration::days(2));
        let mut newer_published = record(json!({"title": "B", "content_type": "post"}));
        newer_published.published_at = Some(now - Duration::days(1));
        let mut draft = record(json!({"title": "C", "content_type": "post"}));
        draft.created_at = now + Duration::days(1);

        let mut items = vec![draft.clone(), older_published.clone(), newer_published.clone()];
        items.sort_by(listing_order);
        assert_eq!(items[0].id, newer_published.id);
        assert_eq!(items[1].id, older_published.id);
        assert_eq!(items[2].id, draft.id);
    }

    // -- like_pattern --------------------------------------------------------

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
