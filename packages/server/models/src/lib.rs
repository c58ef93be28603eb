#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the edustats server.
//!
//! Query parameters arrive as raw strings so that malformed numbers and
//! unknown school levels can be reported through the JSON error envelope
//! instead of the framework's plain-text rejection. They are separate
//! from the analytics types to allow independent evolution of the API
//! contract.

use edustats_database_models::Pagination;
use serde::{Deserialize, Serialize};

/// Successful response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Endpoint payload.
    pub data: T,
    /// Present on paginated endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` without pagination.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    /// Wraps one page of `data`.
    pub const fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for `/regions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionsQueryParams {
    /// When set, list this province's sub-regions instead.
    pub sido: Option<String>,
}

/// Query parameters shared by `/statistics` and `/schools`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryParams {
    /// Year.
    pub year: Option<String>,
    /// Province short name.
    pub sido: Option<String>,
    /// Sub-region name.
    pub sigungu: Option<String>,
    /// School level name.
    pub school_level: Option<String>,
    /// 1-indexed page.
    pub page: Option<String>,
    /// Rows per page.
    pub limit: Option<String>,
}

/// Query parameters for `/statistics/summary`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQueryParams {
    /// Year; defaults to the reporting year.
    pub year: Option<String>,
    /// Province short name.
    pub sido: Option<String>,
    /// Sub-region name.
    pub sigungu: Option<String>,
    /// School level name.
    pub school_level: Option<String>,
}

/// Query parameters for `/statistics/trend`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQueryParams {
    /// Province short name.
    pub sido: Option<String>,
    /// Sub-region name.
    pub sigungu: Option<String>,
    /// School level name.
    pub school_level: Option<String>,
}

/// Query parameters for `/statistics/map`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Year; defaults to the reporting year.
    pub year: Option<String>,
    /// School level name.
    pub school_level: Option<String>,
}

/// Query parameters for `/statistics/compare`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareQueryParams {
    /// JSON array of province arrays, e.g. `[["서울"],["부산","대구"]]`.
    pub groups: Option<String>,
    /// School level name.
    pub school_level: Option<String>,
}

/// Query parameters for `/schools/{name}/detail`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDetailQueryParams {
    /// Year; defaults to the reporting year.
    pub year: Option<String>,
    /// Province, to disambiguate schools sharing a name.
    pub sido: Option<String>,
}
