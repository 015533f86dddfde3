//! Filter/sort/paginate pipeline for the public exhibit listing.
//!
//! The engine is a pure function over an in-memory batch of records: the API
//! route fetches the published set once and every parameter combination is
//! computed here, so the contract is testable without a live store. Stateless,
//! no caching, safe to call concurrently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Exhibit;

pub const DEFAULT_LIMIT: i64 = 6;
pub const MAX_LIMIT: i64 = 100;

/// Sentinel category meaning "no filter".
pub const CATEGORY_ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    /// Unrecognized values fall back to `Newest` rather than failing.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => SortOrder::Oldest,
            Some("az") => SortOrder::TitleAsc,
            Some("za") => SortOrder::TitleDesc,
            _ => SortOrder::Newest,
        }
    }
}

/// Raw query parameters as they arrive on the wire. Numbers are kept as
/// strings so junk input can fall back to defaults instead of failing
/// extraction; range checks still reject out-of-bounds values.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            sort: SortOrder::Newest,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    pub fn from_raw(raw: RawListParams) -> Self {
        Self {
            category: raw
                .category
                .filter(|category| !category.is_empty() && category != CATEGORY_ALL),
            search: raw
                .search
                .map(|search| search.trim().to_string())
                .filter(|search| !search.is_empty()),
            sort: SortOrder::parse(raw.sort.as_deref()),
            page: int_or(raw.page.as_deref(), 1),
            limit: int_or(raw.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    /// Range checks happen before any store access. Out-of-range values are
    /// rejected outright, never clamped.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page < 1 || self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(QueryError::InvalidPagination);
        }
        Ok(())
    }
}

// Zero falls back to the default too, matching the original parse-or-default
// treatment of pagination parameters.
fn int_or(value: Option<&str>, fallback: i64) -> i64 {
    match value.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(0) | None => fallback,
        Some(n) => n,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("page must be >= 1 and limit within 1..=100")]
    InvalidPagination,
}

/// Metadata sufficient to render pagination controls.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct QueryPage {
    pub exhibits: Vec<Exhibit>,
    pub pagination: Pagination,
}

/// Run the listing pipeline: published-only eligibility, category filter,
/// then search filter, stable sort, then the page slice.
pub fn run(records: Vec<Exhibit>, params: &ListParams) -> Result<QueryPage, QueryError> {
    params.validate()?;

    let mut eligible: Vec<Exhibit> = records
        .into_iter()
        .filter(|exhibit| exhibit.published)
        .collect();

    if let Some(category) = params.category.as_deref() {
        eligible.retain(|exhibit| exhibit.category.as_deref() == Some(category));
    }

    if let Some(search) = params.search.as_deref() {
        let needle = search.to_lowercase();
        eligible.retain(|exhibit| {
            exhibit.title.to_lowercase().contains(&needle)
                || exhibit.description.to_lowercase().contains(&needle)
        });
    }

    // Vec::sort_by is stable, so equal keys keep their store order.
    match params.sort {
        SortOrder::Newest => eligible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => eligible.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::TitleAsc => {
            eligible.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        SortOrder::TitleDesc => {
            eligible.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
    }

    let total = eligible.len() as i64;
    let total_pages = (total + params.limit - 1) / params.limit;
    // A huge page number can overflow the slice start; any out-of-range
    // start yields an empty page, so saturating is correct.
    let start = (params.page - 1).saturating_mul(params.limit);

    let exhibits: Vec<Exhibit> = eligible
        .into_iter()
        .skip(start as usize)
        .take(params.limit as usize)
        .collect();

    Ok(QueryPage {
        exhibits,
        pagination: Pagination {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
            has_more: params.page < total_pages,
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::content::Translations;

    fn exhibit(title: &str, description: &str, category: Option<&str>, published: bool) -> Exhibit {
        Exhibit {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            title_translations: Translations::new(),
            description_translations: Translations::new(),
            category: category.map(str::to_string),
            image_url: None,
            published,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn batch(count: usize) -> Vec<Exhibit> {
        (0..count)
            .map(|i| {
                let mut record = exhibit(&format!("Exhibit {i}"), "description", None, true);
                record.created_at += Duration::days(i as i64);
                record
            })
            .collect()
    }

    fn params() -> ListParams {
        ListParams::default()
    }

    #[test]
    fn unpublished_records_never_appear() {
        let records = vec![
            exhibit("Visible", "shown", None, true),
            exhibit("Hidden", "draft", None, false),
        ];
        let page = run(records, &params()).unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.exhibits[0].title, "Visible");
    }

    #[test]
    fn category_filter_is_exact_match() {
        let records = vec![
            exhibit("A", "x", Some("Paintings"), true),
            exhibit("B", "x", Some("Sculpture"), true),
            exhibit("C", "x", None, true),
        ];
        let page = run(
            records,
            &ListParams {
                category: Some("Paintings".to_string()),
                ..params()
            },
        )
        .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.exhibits[0].title, "A");
    }

    #[test]
    fn category_sentinel_means_no_filter() {
        let parsed = ListParams::from_raw(RawListParams {
            category: Some("All".to_string()),
            ..RawListParams::default()
        });
        assert_eq!(parsed.category, None);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let records = vec![
            exhibit("Art & Paintings", "oil on canvas", None, true),
            exhibit("Pottery", "an Artistic tradition", None, true),
            exhibit("Textiles", "woven cloth", None, true),
        ];

        for needle in ["art", "ART"] {
            let page = run(
                records.clone(),
                &ListParams {
                    search: Some(needle.to_string()),
                    ..params()
                },
            )
            .unwrap();
            let titles: Vec<&str> = page.exhibits.iter().map(|e| e.title.as_str()).collect();
            assert_eq!(titles.len(), 2, "search {needle:?}");
            assert!(titles.contains(&"Art & Paintings"));
            assert!(titles.contains(&"Pottery"));
        }
    }

    #[test]
    fn blank_search_imposes_no_filter() {
        let parsed = ListParams::from_raw(RawListParams {
            search: Some("   ".to_string()),
            ..RawListParams::default()
        });
        assert_eq!(parsed.search, None);
    }

    #[test]
    fn newest_sorts_created_at_descending() {
        let page = run(batch(3), &params()).unwrap();
        let titles: Vec<&str> = page.exhibits.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Exhibit 2", "Exhibit 1", "Exhibit 0"]);
    }

    #[test]
    fn oldest_sorts_created_at_ascending() {
        let page = run(
            batch(3),
            &ListParams {
                sort: SortOrder::Oldest,
                ..params()
            },
        )
        .unwrap();
        let titles: Vec<&str> = page.exhibits.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Exhibit 0", "Exhibit 1", "Exhibit 2"]);
    }

    #[test]
    fn title_sorts_are_case_folded_and_mirrored() {
        let records = vec![
            exhibit("zebra", "x", None, true),
            exhibit("Apple", "x", None, true),
            exhibit("mango", "x", None, true),
        ];

        let az = run(
            records.clone(),
            &ListParams {
                sort: SortOrder::TitleAsc,
                ..params()
            },
        )
        .unwrap();
        let az_titles: Vec<&str> = az.exhibits.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(az_titles, ["Apple", "mango", "zebra"]);

        let za = run(
            records,
            &ListParams {
                sort: SortOrder::TitleDesc,
                ..params()
            },
        )
        .unwrap();
        let za_titles: Vec<&str> = za.exhibits.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(za_titles, ["zebra", "mango", "Apple"]);
    }

    #[test]
    fn fourteen_records_at_limit_six_paginate_to_three_pages() {
        let page = run(batch(14), &params()).unwrap();
        assert_eq!(page.exhibits.len(), 6);
        assert_eq!(
            page.pagination,
            Pagination {
                page: 1,
                limit: 6,
                total: 14,
                total_pages: 3,
                has_more: true,
            }
        );

        let last = run(
            batch(14),
            &ListParams {
                page: 3,
                ..params()
            },
        )
        .unwrap();
        assert_eq!(last.exhibits.len(), 2);
        assert!(!last.pagination.has_more);
    }

    #[test]
    fn enormous_page_numbers_yield_an_empty_page() {
        let page = run(
            batch(4),
            &ListParams {
                page: 3_000_000_000_000_000_000,
                ..params()
            },
        )
        .unwrap();
        assert!(page.exhibits.is_empty());
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let page = run(
            batch(4),
            &ListParams {
                page: 9,
                ..params()
            },
        )
        .unwrap();
        assert!(page.exhibits.is_empty());
        assert!(!page.pagination.has_more);
        assert_eq!(page.pagination.total, 4);
    }

    #[test]
    fn empty_result_set_has_zero_pages() {
        let page = run(Vec::new(), &params()).unwrap();
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn limit_out_of_range_is_a_validation_error() {
        for limit in [101, -1] {
            let result = run(
                batch(1),
                &ListParams {
                    limit,
                    ..params()
                },
            );
            assert_eq!(result.unwrap_err(), QueryError::InvalidPagination);
        }
    }

    #[test]
    fn negative_page_is_a_validation_error() {
        let result = run(
            batch(1),
            &ListParams {
                page: -1,
                ..params()
            },
        );
        assert_eq!(result.unwrap_err(), QueryError::InvalidPagination);
    }

    #[test]
    fn limit_boundaries_are_inclusive() {
        for limit in [1, 100] {
            assert!(
                run(
                    batch(2),
                    &ListParams {
                        limit,
                        ..params()
                    },
                )
                .is_ok()
            );
        }
    }

    #[test]
    fn slice_length_matches_remaining_records() {
        // min(limit, total - (page-1)*limit) clamped to >= 0, for every page.
        let total = 14i64;
        let limit = 6i64;
        for page_number in 1..=4 {
            let page = run(
                batch(total as usize),
                &ListParams {
                    page: page_number,
                    limit,
                    ..params()
                },
            )
            .unwrap();
            let expected = (total - (page_number - 1) * limit).clamp(0, limit);
            assert_eq!(page.exhibits.len() as i64, expected, "page {page_number}");
        }
    }

    #[test]
    fn raw_params_fall_back_on_junk_numbers() {
        let parsed = ListParams::from_raw(RawListParams {
            page: Some("abc".to_string()),
            limit: Some("".to_string()),
            ..RawListParams::default()
        });
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.limit, DEFAULT_LIMIT);

        // Zero is treated as absent, negatives survive to fail validation.
        let parsed = ListParams::from_raw(RawListParams {
            page: Some("0".to_string()),
            limit: Some("-5".to_string()),
            ..RawListParams::default()
        });
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.limit, -5);
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Newest);
        assert_eq!(SortOrder::parse(None), SortOrder::Newest);
        assert_eq!(SortOrder::parse(Some("za")), SortOrder::TitleDesc);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let pagination = Pagination {
            page: 1,
            limit: 6,
            total: 14,
            total_pages: 3,
            has_more: true,
        };
        let value = serde_json::to_value(&pagination).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "page": 1,
                "limit": 6,
                "total": 14,
                "totalPages": 3,
                "hasMore": true
            })
        );
    }
}
