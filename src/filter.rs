//! Derived-View Filter/Sort Engine
//!
//! Pure functions computing the displayed subset of a local snapshot. Nothing
//! here mutates its input; the same snapshot and query always give the same view.

use std::cmp::Ordering;

use crate::domain::FlexDate;

/// A field value borrowed from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
    Date(&'a FlexDate),
}

impl<'a> FieldValue<'a> {
    fn sort_weight(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Date(d) => d.timestamp_millis() as f64,
            _ => 0.0,
        }
    }

    fn equals(&self, wanted: &str) -> bool {
        match self {
            FieldValue::Text(s) => *s == wanted,
            FieldValue::Number(n) => wanted.parse::<f64>().is_ok_and(|w| w == *n),
            FieldValue::Flag(b) => wanted.parse::<bool>().is_ok_and(|w| w == *b),
            FieldValue::Date(d) => FlexDate::parse(wanted).is_some_and(|w| w == **d),
        }
    }
}

pub fn text(value: &Option<String>) -> Option<FieldValue<'_>> {
    value.as_deref().map(FieldValue::Text)
}

pub fn number(value: Option<f64>) -> Option<FieldValue<'static>> {
    value.map(FieldValue::Number)
}

pub fn flag(value: Option<bool>) -> Option<FieldValue<'static>> {
    value.map(FieldValue::Flag)
}

pub fn date(value: &Option<FlexDate>) -> Option<FieldValue<'_>> {
    value.as_ref().map(FieldValue::Date)
}

/// Records the engine can search, filter and sort
pub trait Filterable {
    /// Text fields consulted by free-text search
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// Look up a field by its wire name (`jobTitle`, `isActive`, ...)
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// A predicate on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    /// Exact equality; an empty value or "all" disables the filter
    Equals { field: String, value: String },
    /// The value must equal one of the comma-separated, trimmed tokens
    Tag { field: String, value: String },
    /// Boolean field must hold `expected`; a missing field never matches
    Flag { field: String, expected: bool },
}

impl FieldFilter {
    fn is_active(&self) -> bool {
        match self {
            FieldFilter::Equals { value, .. } | FieldFilter::Tag { value, .. } => !is_sentinel(value),
            FieldFilter::Flag { .. } => true,
        }
    }

    fn matches<T: Filterable>(&self, item: &T) -> bool {
        if !self.is_active() {
            return true;
        }
        match self {
            FieldFilter::Equals { field, value } => {
                item.field(field).is_some_and(|v| v.equals(value))
            }
            FieldFilter::Tag { field, value } => match item.field(field) {
                Some(FieldValue::Text(raw)) => split_tags(raw).any(|tag| tag == value.trim()),
                _ => false,
            },
            FieldFilter::Flag { field, expected } => {
                matches!(item.field(field), Some(FieldValue::Flag(b)) if b == *expected)
            }
        }
    }
}

fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

/// Explicit ordering for a derived view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Latest date (or largest number) first; missing values sort as zero
    NewestFirst(String),
    /// Smallest number (or earliest date) first; missing values sort as zero
    Ascending(String),
}

/// Search text, field predicates and an optional sort
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub filters: Vec<FieldFilter>,
    pub sort: Option<SortKey>,
}

impl ViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn equals(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter::Equals {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn tag(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter::Tag {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn flag(mut self, field: &str, expected: bool) -> Self {
        self.filters.push(FieldFilter::Flag {
            field: field.to_string(),
            expected,
        });
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        matches_search(item, &self.search) && self.filters.iter().all(|f| f.matches(item))
    }
}

/// Case-insensitive substring match over the record's search fields
pub fn matches_search<T: Filterable>(item: &T, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    item.search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Compute the derived view of `items` for `query`
pub fn apply<T: Filterable + Clone>(items: &[T], query: &ViewQuery) -> Vec<T> {
    let mut view: Vec<T> = items.iter().filter(|item| query.matches(*item)).cloned().collect();
    if let Some(key) = &query.sort {
        sort_view(&mut view, key);
    }
    view
}

/// Stable in-place sort by `key`
pub fn sort_view<T: Filterable>(items: &mut [T], key: &SortKey) {
    let weight = |item: &T, field: &str| item.field(field).map(|v| v.sort_weight()).unwrap_or(0.0);
    match key {
        SortKey::NewestFirst(field) => items.sort_by(|a, b| {
            weight(b, field).partial_cmp(&weight(a, field)).unwrap_or(Ordering::Equal)
        }),
        SortKey::Ascending(field) => items.sort_by(|a, b| {
            weight(a, field).partial_cmp(&weight(b, field)).unwrap_or(Ordering::Equal)
        }),
    }
}

/// Split a comma-delimited tag field into trimmed, non-empty tokens
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Distinct non-empty text values of `field`, in first-seen order
pub fn distinct_values<T: Filterable>(items: &[T], field: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if let Some(FieldValue::Text(value)) = item.field(field) {
            if !value.is_empty() && !seen.iter().any(|s| s == value) {
                seen.push(value.to_string());
            }
        }
    }
    seen
}

/// Distinct tokens of a comma-delimited field, in first-seen order
pub fn distinct_tags<T: Filterable>(items: &[T], field: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if let Some(FieldValue::Text(raw)) = item.field(field) {
            for tag in split_tags(raw) {
                if !seen.iter().any(|s| s == tag) {
                    seen.push(tag.to_string());
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlogPost, JobOpening, Project, Testimonial};

    fn post(id: &str, title: &str, published: Option<&str>) -> BlogPost {
        BlogPost {
            id: id.to_string(),
            title: Some(title.to_string()),
            publish_date: published.and_then(FlexDate::parse),
            ..Default::default()
        }
    }

    fn project(id: &str, tags: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            project_name: Some(format!("Project {}", id)),
            tags: tags.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_matches_single_post() {
        let posts = vec![
            post("1", "Intro to AI", None),
            post("2", "Cloud Basics", None),
            post("3", "Hiring Update", None),
        ];
        let view = apply(&posts, &ViewQuery::new().search("cloud"));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title.as_deref(), Some("Cloud Basics"));
    }

    #[test]
    fn test_empty_search_keeps_order() {
        let posts = vec![post("b", "B", None), post("a", "A", None)];
        let view = apply(&posts, &ViewQuery::new());
        let ids: Vec<_> = view.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_active_only_jobs() {
        let jobs = vec![
            JobOpening {
                id: "open".into(),
                job_title: Some("Engineer".into()),
                is_active: Some(true),
                ..Default::default()
            },
            JobOpening {
                id: "closed".into(),
                job_title: Some("Designer".into()),
                is_active: Some(false),
                ..Default::default()
            },
            JobOpening {
                id: "unknown".into(),
                job_title: Some("Writer".into()),
                ..Default::default()
            },
        ];
        let view = apply(&jobs, &ViewQuery::new().flag("isActive", true));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "open");
    }

    #[test]
    fn test_tag_filter_requires_whole_token() {
        let projects = vec![project("1", Some("AI, Cloud")), project("2", None)];

        let cloud = apply(&projects, &ViewQuery::new().tag("tags", "Cloud"));
        assert_eq!(cloud.len(), 1);
        assert_eq!(cloud[0].id, "1");

        let partial = apply(&projects, &ViewQuery::new().tag("tags", "Clo"));
        assert!(partial.is_empty());
    }

    #[test]
    fn test_sentinel_disables_filter() {
        let projects = vec![project("1", Some("AI")), project("2", None)];
        assert_eq!(apply(&projects, &ViewQuery::new().tag("tags", "all")).len(), 2);
        assert_eq!(apply(&projects, &ViewQuery::new().equals("clientName", "")).len(), 2);
    }

    #[test]
    fn test_missing_field_never_matches_equality() {
        let projects = vec![project("1", None)];
        let view = apply(&projects, &ViewQuery::new().equals("clientName", "Acme"));
        assert!(view.is_empty());
    }

    #[test]
    fn test_numeric_equality_on_rating() {
        let ratings = [Some(5.0), Some(4.0), None];
        let items: Vec<Testimonial> = ratings
            .iter()
            .enumerate()
            .map(|(i, rating)| Testimonial {
                id: i.to_string(),
                rating: *rating,
                ..Default::default()
            })
            .collect();
        let view = apply(&items, &ViewQuery::new().equals("rating", "4"));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "1");
    }

    #[test]
    fn test_newest_first_puts_missing_dates_last() {
        let posts = vec![
            post("undated", "Undated", None),
            post("old", "Old", Some("2023-01-01")),
            post("new", "New", Some("2024-06-01T12:00:00Z")),
        ];
        let view = apply(&posts, &ViewQuery::new().sort(SortKey::NewestFirst("publishDate".into())));
        let ids: Vec<_> = view.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_apply_is_idempotent_and_pure() {
        let posts = vec![
            post("1", "Cloud Native", Some("2024-01-01")),
            post("2", "cloud costs", Some("2024-02-01")),
            post("3", "Hiring", None),
        ];
        let before = posts.clone();
        let query = ViewQuery::new()
            .search("CLOUD")
            .sort(SortKey::NewestFirst("publishDate".into()));
        let first = apply(&posts, &query);
        let second = apply(&posts, &query);
        assert_eq!(first, second);
        assert_eq!(posts, before);
    }

    #[test]
    fn test_distinct_tags_trimmed_in_first_seen_order() {
        let projects = vec![
            project("1", Some("Cloud, AI")),
            project("2", Some("AI ,Mobile,")),
            project("3", None),
        ];
        assert_eq!(distinct_tags(&projects, "tags"), vec!["Cloud", "AI", "Mobile"]);
    }
}
