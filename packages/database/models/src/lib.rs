#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Query filter, predicate builder and pagination types.
//!
//! Optional filters are expressed as a list of typed [`FilterClause`]s
//! over a closed [`Column`] set instead of concatenated SQL. A
//! [`Predicate`] renders to a parameterized `WHERE` clause with `$n`
//! placeholders, so the SQL text and its parameter list are always built
//! together and can be checked in isolation.

use edustats_school_models::SchoolLevel;
use serde::{Deserialize, Serialize};

/// Filter columns shared by `student_statistics` and `student_data_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// `year`
    Year,
    /// `sido`
    Sido,
    /// `sigungu`
    Sigungu,
    /// `school_level`
    SchoolLevel,
    /// `school_name` (raw table only)
    SchoolName,
    /// `grade` (raw table only)
    Grade,
}

impl Column {
    /// The SQL column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Sido => "sido",
            Self::Sigungu => "sigungu",
            Self::SchoolLevel => "school_level",
            Self::SchoolName => "school_name",
            Self::Grade => "grade",
        }
    }
}

/// A typed filter parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    /// Integer parameter.
    Int(i32),
    /// Text parameter, matched exactly and case-sensitively.
    Text(String),
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<SchoolLevel> for FilterValue {
    fn from(value: SchoolLevel) -> Self {
        Self::Text(value.to_string())
    }
}

/// A single condition on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterClause {
    /// `column = value`
    Eq {
        /// Filtered column.
        column: Column,
        /// Required value.
        value: FilterValue,
    },
    /// `column IN (values...)`. An empty list matches nothing.
    In {
        /// Filtered column.
        column: Column,
        /// Accepted values.
        values: Vec<FilterValue>,
    },
    /// `column IS NULL`
    IsNull {
        /// Filtered column.
        column: Column,
    },
    /// `column IS NOT NULL`
    NotNull {
        /// Filtered column.
        column: Column,
    },
}

impl FilterClause {
    /// The column this clause filters on.
    #[must_use]
    pub const fn column(&self) -> Column {
        match self {
            Self::Eq { column, .. }
            | Self::In { column, .. }
            | Self::IsNull { column }
            | Self::NotNull { column } => *column,
        }
    }
}

/// A conjunction of [`FilterClause`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    clauses: Vec<FilterClause>,
}

/// SQL produced by [`Predicate::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPredicate {
    /// One SQL condition per clause, in clause order.
    pub fragments: Vec<String>,
    /// Parameters in placeholder order.
    pub params: Vec<FilterValue>,
    /// The next unused placeholder index.
    pub next_index: u32,
}

impl RenderedPredicate {
    /// Returns `" WHERE a AND b"`, or an empty string when there are no
    /// conditions.
    #[must_use]
    pub fn where_clause(&self) -> String {
        if self.fragments.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.fragments.join(" AND "))
        }
    }
}

impl Predicate {
    /// An empty predicate (matches every row).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Adds `column = value`.
    #[must_use]
    pub fn where_eq(mut self, column: Column, value: impl Into<FilterValue>) -> Self {
        self.clauses.push(FilterClause::Eq {
            column,
            value: value.into(),
        });
        self
    }

    /// Adds `column = value` when `value` is present.
    #[must_use]
    pub fn where_eq_opt<V: Into<FilterValue>>(self, column: Column, value: Option<V>) -> Self {
        match value {
            Some(v) => self.where_eq(column, v),
            None => self,
        }
    }

    /// Adds `column IN (values...)`.
    #[must_use]
    pub fn where_in<V: Into<FilterValue>>(
        mut self,
        column: Column,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.clauses.push(FilterClause::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds `column IS NULL`.
    #[must_use]
    pub fn where_null(mut self, column: Column) -> Self {
        self.clauses.push(FilterClause::IsNull { column });
        self
    }

    /// Adds `column IS NOT NULL`.
    #[must_use]
    pub fn where_not_null(mut self, column: Column) -> Self {
        self.clauses.push(FilterClause::NotNull { column });
        self
    }

    /// Builds the predicate for the optional dimensions of a
    /// [`StatisticsFilter`], in the order year, sido, sigungu, school level.
    #[must_use]
    pub fn from_filter(filter: &StatisticsFilter) -> Self {
        Self::new()
            .where_eq_opt(Column::Year, filter.year)
            .where_eq_opt(Column::Sido, filter.sido.clone())
            .where_eq_opt(Column::Sigungu, filter.sigungu.clone())
            .where_eq_opt(Column::SchoolLevel, filter.school_level)
    }

    /// The clauses in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Whether any clause filters on `column`.
    #[must_use]
    pub fn constrains(&self, column: Column) -> bool {
        self.clauses.iter().any(|c| c.column() == column)
    }

    /// Renders the clauses with placeholders starting at `$start_index`.
    #[must_use]
    pub fn render(&self, start_index: u32) -> RenderedPredicate {
        let mut fragments = Vec::with_capacity(self.clauses.len());
        let mut params = Vec::new();
        let mut idx = start_index;

        for clause in &self.clauses {
            match clause {
                FilterClause::Eq { column, value } => {
                    fragments.push(format!("{} = ${idx}", column.name()));
                    params.push(value.clone());
                    idx += 1;
                }
                FilterClause::In { column, values } => {
                    if values.is_empty() {
                        fragments.push("1 = 0".to_string());
                        continue;
                    }
                    let placeholders: Vec<String> = values
                        .iter()
                        .map(|value| {
                            params.push(value.clone());
                            let p = format!("${idx}");
                            idx += 1;
                            p
                        })
                        .collect();
                    fragments.push(format!("{} IN ({})", column.name(), placeholders.join(", ")));
                }
                FilterClause::IsNull { column } => {
                    fragments.push(format!("{} IS NULL", column.name()));
                }
                FilterClause::NotNull { column } => {
                    fragments.push(format!("{} IS NOT NULL", column.name()));
                }
            }
        }

        RenderedPredicate {
            fragments,
            params,
            next_index: idx,
        }
    }
}

/// The optional filter dimensions shared by every statistics view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsFilter {
    /// Survey year.
    pub year: Option<i32>,
    /// Province short name.
    pub sido: Option<String>,
    /// Sub-region name.
    pub sigungu: Option<String>,
    /// School level.
    pub school_level: Option<SchoolLevel>,
}

impl StatisticsFilter {
    /// Sets the year.
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the province.
    #[must_use]
    pub fn with_sido(mut self, sido: impl Into<String>) -> Self {
        self.sido = Some(sido.into());
        self
    }

    /// Sets the sub-region.
    #[must_use]
    pub fn with_sigungu(mut self, sigungu: impl Into<String>) -> Self {
        self.sigungu = Some(sigungu.into());
        self
    }

    /// Sets the school level.
    #[must_use]
    pub const fn with_school_level(mut self, level: SchoolLevel) -> Self {
        self.school_level = Some(level);
        self
    }
}

/// A 1-indexed, offset-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page, at least 1.
    pub limit: u32,
}

impl PageRequest {
    /// Creates a page request, raising `page` and `limit` to at least 1.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Requested page.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Total rows across all pages.
    pub total: u64,
    /// Number of pages, `ceil(total / limit)`.
    pub total_pages: u64,
}

impl Pagination {
    /// Computes pagination metadata for `request` over `total` rows.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// Filter option lists for the dashboard dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionsOverview {
    /// Provinces with data, ascending.
    pub sidos: Vec<String>,
    /// Years with data, most recent first.
    pub years: Vec<i32>,
    /// School levels with data, in [`SchoolLevel::all`] order.
    pub school_levels: Vec<SchoolLevel>,
}

/// A page of pre-aggregated statistics rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsPage {
    /// Rows on this page.
    pub rows: Vec<edustats_school_models::StudentStatistics>,
    /// Pagination metadata.
    pub pagination: Pagination,
}
