//! # Pagination
//!
//! Page/limit windowing shared by every listing endpoint. Repositories receive
//! a [`PageRequest`] (already validated) and return the page of rows together
//! with the total row count; [`paginate`] turns that into the response shape.

use serde::{Deserialize, Serialize};

use crate::errors::{FieldViolation, ServiceError, ServiceResult};

/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Largest page number whose offset still fits in an `i64` at [`MAX_LIMIT`].
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query string accepted by the paginated listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
}

/// A validated page window with a sort column drawn from a fixed whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub sort_column: &'static str,
    pub sort_order: SortOrder,
}

impl PageRequest {
    /// Validates the raw query against the columns a listing may be sorted by.
    ///
    /// The first entry of `sortable` is the default column. Returning the
    /// whitelisted `&'static str` keeps caller input out of the SQL text.
    pub fn from_query(
        query: &PaginationQuery,
        sortable: &[&'static str],
    ) -> ServiceResult<Self> {
        let mut violations = Vec::new();

        let page = match query.page {
            Some(page) if (1..=MAX_PAGE).contains(&page) => page,
            Some(page) if page > MAX_PAGE => {
                violations.push(FieldViolation::new(
                    "page",
                    format!("must be at most {MAX_PAGE}"),
                ));
                1
            }
            Some(_) => {
                violations.push(FieldViolation::new("page", "must be at least 1"));
                1
            }
            None => {
                violations.push(FieldViolation::new("page", "is required"));
                1
            }
        };

        let limit = match query.limit {
            Some(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
            Some(_) => {
                violations.push(FieldViolation::new(
                    "limit",
                    format!("must be between 1 and {MAX_LIMIT}"),
                ));
                1
            }
            None => {
                violations.push(FieldViolation::new("limit", "is required"));
                1
            }
        };

        let default_column = sortable.first().copied().unwrap_or("created_at");
        let sort_column = match query.sort_column.as_deref() {
            None | Some("") => default_column,
            Some(raw) => match sortable.iter().find(|column| **column == raw) {
                Some(column) => *column,
                None => {
                    violations.push(FieldViolation::new(
                        "sortColumn",
                        format!("must be one of: {}", sortable.join(", ")),
                    ));
                    default_column
                }
            },
        };

        let sort_order = match query.sort_order.as_deref() {
            None | Some("") => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw).unwrap_or_else(|| {
                violations.push(FieldViolation::new("sortOrder", "must be asc or desc"));
                SortOrder::default()
            }),
        };

        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        Ok(Self {
            page,
            limit,
            sort_column,
            sort_order,
        })
    }

    pub fn offset(&self) -> i64 {
        offset(self.page, self.limit)
    }
}

/// Number of rows to skip before the given page.
pub fn offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub next_page: Option<i64>,
    pub previous_page: Option<i64>,
}

/// Wraps one page of items with its window metadata.
pub fn paginate<T>(items: Vec<T>, total_count: i64, page: i64, limit: i64) -> Paginated<T> {
    let total_pages = if limit > 0 {
        (total_count + limit - 1) / limit
    } else {
        0
    };

    Paginated {
        items,
        page,
        limit,
        total_pages,
        total_count,
        next_page: (page < total_pages).then_some(page + 1),
        previous_page: (page > 1).then_some(page - 1),
    }
}
