//! HTTP handler functions for the edustats API.

use actix_web::{HttpRequest, HttpResponse, web};
use edustats_analytics::{compare, map, schools, summary, trend};
use edustats_analytics_models::{
    CompareParams, MapParams, SchoolDetailParams, SchoolsParams, TrendParams,
};
use edustats_database::queries;
use edustats_database_models::{PageRequest, StatisticsFilter};
use edustats_server_models::{
    ApiHealth, ApiResponse, CompareQueryParams, ListQueryParams, MapQueryParams,
    RegionsQueryParams, SchoolDetailQueryParams, SummaryQueryParams, TrendQueryParams,
};

use crate::AppState;
use crate::error::ApiError;
use crate::params;

type ApiResult = Result<HttpResponse, ApiError>;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Fallback for unmatched paths.
pub async fn not_found(req: HttpRequest) -> ApiResult {
    Err(ApiError::NotFound(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

/// `GET /api/regions`
///
/// Without `sido`, returns the provinces, years and school levels present
/// in the data. With `sido`, returns that province's sub-regions.
pub async fn regions(
    state: web::Data<AppState>,
    query: web::Query<RegionsQueryParams>,
) -> ApiResult {
    let db = state.db.as_ref();

    if let Some(sido) = params::present(query.sido.as_ref()) {
        let sigungus = queries::list_sigungus(db, sido)
            .await
            .map_err(ApiError::internal("sub-regions"))?;
        return Ok(HttpResponse::Ok().json(ApiResponse::ok(sigungus)));
    }

    let overview = queries::regions_overview(db)
        .await
        .map_err(ApiError::internal("regions"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(overview)))
}

/// `GET /api/regions/tree`
///
/// Returns every province mapped to its sorted sub-regions.
pub async fn region_tree(state: web::Data<AppState>) -> ApiResult {
    let tree = queries::region_tree(state.db.as_ref())
        .await
        .map_err(ApiError::internal("region tree"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tree)))
}

/// `GET /api/statistics`
///
/// Pre-aggregated rows, newest year first. No year filter unless given.
pub async fn statistics(
    state: web::Data<AppState>,
    query: web::Query<ListQueryParams>,
) -> ApiResult {
    let filter = list_filter(&query, None)?;
    let page = PageRequest::new(
        params::page(query.page.as_ref())?,
        params::limit(query.limit.as_ref(), params::DEFAULT_STATISTICS_LIMIT)?,
    );

    let result = queries::query_statistics(state.db.as_ref(), &filter, page)
        .await
        .map_err(ApiError::internal("statistics"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(result.rows, result.pagination)))
}

/// `GET /api/statistics/summary`
pub async fn statistics_summary(
    state: web::Data<AppState>,
    query: web::Query<SummaryQueryParams>,
) -> ApiResult {
    let year = params::year_or(query.year.as_ref(), state.default_year)?;
    let filter = StatisticsFilter {
        year: Some(year),
        sido: params::text(query.sido.as_ref()),
        sigungu: params::text(query.sigungu.as_ref()),
        school_level: params::school_level(query.school_level.as_ref())?,
    };

    let result = summary::summary(state.db.as_ref(), year, &filter)
        .await
        .map_err(ApiError::internal("summary"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

/// `GET /api/statistics/trend`
pub async fn statistics_trend(
    state: web::Data<AppState>,
    query: web::Query<TrendQueryParams>,
) -> ApiResult {
    let trend_params = TrendParams {
        sido: params::text(query.sido.as_ref()),
        sigungu: params::text(query.sigungu.as_ref()),
        school_level: params::school_level(query.school_level.as_ref())?,
    };

    let points = trend::trend(state.db.as_ref(), &trend_params)
        .await
        .map_err(ApiError::internal("trend"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(points)))
}

/// `GET /api/statistics/map`
pub async fn statistics_map(
    state: web::Data<AppState>,
    query: web::Query<MapQueryParams>,
) -> ApiResult {
    let map_params = MapParams {
        year: params::year_or(query.year.as_ref(), state.default_year)?,
        school_level: params::school_level(query.school_level.as_ref())?,
    };

    let result = map::map_data(state.db.as_ref(), &map_params, &state.sidos)
        .await
        .map_err(ApiError::internal("map data"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

/// `GET /api/statistics/compare`
///
/// `groups` is a JSON array of province arrays. Fails as a whole if any
/// group's query fails.
pub async fn statistics_compare(
    state: web::Data<AppState>,
    query: web::Query<CompareQueryParams>,
) -> ApiResult {
    let compare_params = CompareParams {
        groups: params::groups(query.groups.as_ref())?,
        school_level: params::school_level(query.school_level.as_ref())?,
    };

    let result = compare::compare(state.db.as_ref(), &compare_params)
        .await
        .map_err(ApiError::internal("comparison"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

/// `GET /api/schools`
pub async fn schools_list(
    state: web::Data<AppState>,
    query: web::Query<ListQueryParams>,
) -> ApiResult {
    let schools_params = SchoolsParams {
        filter: list_filter(&query, Some(state.default_year))?,
        page: PageRequest::new(
            params::page(query.page.as_ref())?,
            params::limit(query.limit.as_ref(), params::DEFAULT_SCHOOLS_LIMIT)?,
        ),
    };

    let result = schools::schools_list(state.db.as_ref(), &schools_params)
        .await
        .map_err(ApiError::internal("schools"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(result.schools, result.pagination)))
}

/// `GET /api/schools/{name}/detail`
pub async fn school_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SchoolDetailQueryParams>,
) -> ApiResult {
    let detail_params = SchoolDetailParams {
        school_name: path.into_inner(),
        year: params::year_or(query.year.as_ref(), state.default_year)?,
        sido: params::text(query.sido.as_ref()),
    };

    let detail = schools::school_detail(state.db.as_ref(), &detail_params)
        .await
        .map_err(ApiError::internal("school detail"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// Builds the filter shared by the list endpoints. `default_year` applies
/// when no year is given.
fn list_filter(
    query: &ListQueryParams,
    default_year: Option<i32>,
) -> Result<StatisticsFilter, ApiError> {
    Ok(StatisticsFilter {
        year: params::year(query.year.as_ref())?.or(default_year),
        sido: params::text(query.sido.as_ref()),
        sigungu: params::text(query.sigungu.as_ref()),
        school_level: params::school_level(query.school_level.as_ref())?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use edustats_database::load::{insert_raw_rows, insert_statistics_rows};
    use edustats_database::test_utils::{TempDatabase, raw_row, stats_row};
    use edustats_geography_models::sido::SidoTable;
    use edustats_school_models::SchoolLevel;
    use serde_json::Value;

    use super::*;
    use crate::configure_api;

    async fn seeded() -> TempDatabase {
        let temp = TempDatabase::new().await.unwrap();
        insert_statistics_rows(
            temp.db(),
            &[
                stats_row(2024, "서울", None, SchoolLevel::Elementary, 100, 52, 48, 3),
                stats_row(2025, "서울", None, SchoolLevel::Elementary, 90, 46, 44, 3),
            ],
        )
        .await
        .unwrap();
        insert_raw_rows(
            temp.db(),
            &[
                raw_row(2025, "서울", Some("강남구"), "대치초등학교", SchoolLevel::Elementary, 1, 2, 50, 26, 24),
                raw_row(2025, "서울", Some("강남구"), "대치초등학교", SchoolLevel::Elementary, 2, 2, 40, 20, 20),
            ],
        )
        .await
        .unwrap();
        temp
    }

    fn state(temp: &TempDatabase) -> web::Data<AppState> {
        web::Data::new(AppState {
            db: temp.shared(),
            sidos: Arc::new(SidoTable::standard().unwrap()),
            default_year: 2025,
        })
    }

    macro_rules! get {
        ($app:expr, $uri:expr) => {{
            let resp =
                test::call_service(&$app, test::TestRequest::get().uri($uri).to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure_api)).await;

        let (status, body) = get!(app, "/api/health");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["healthy"], true);
        assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn unknown_routes_use_the_error_body() {
        let app = test::init_service(App::new().configure(configure_api)).await;

        for uri in ["/api/nope", "/elsewhere"] {
            let (status, body) = get!(app, uri);
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["success"], false, "{uri}");
            assert!(body["error"].as_str().unwrap().contains("No route"), "{uri}");
        }
    }

    #[actix_web::test]
    async fn store_failures_are_generic_server_errors() {
        let temp = seeded().await;
        temp.db().exec_raw("DROP TABLE student_statistics").await.unwrap();
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        for (uri, expected) in [
            ("/api/statistics/summary", "Failed to query summary"),
            (
                "/api/statistics/compare?groups=%5B%5B%5D%2C%5B%22%EC%84%9C%EC%9A%B8%22%5D%5D",
                "Failed to query comparison",
            ),
        ] {
            let (status, body) = get!(app, uri);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body["success"], false, "{uri}");
            assert_eq!(body["error"], expected, "{uri}");
            assert!(body.get("data").is_none(), "{uri}");
        }
    }

    #[actix_web::test]
    async fn trend_and_summary_scenario() {
        let temp = seeded().await;
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        let (status, body) = get!(app, "/api/statistics/trend?sido=%EC%84%9C%EC%9A%B8");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["year"], 2024);
        assert_eq!(body["data"][0]["totalStudents"], 100);
        assert_eq!(body["data"][1]["year"], 2025);
        assert_eq!(body["data"][1]["totalStudents"], 90);

        let (status, body) = get!(app, "/api/statistics/summary");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["year"], 2025);
        assert_eq!(body["data"]["total"]["students"], 90);
    }

    #[actix_web::test]
    async fn compare_with_empty_group() {
        let temp = seeded().await;
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        let (status, body) = get!(app, "/api/statistics/compare?groups=%5B%5B%22%EC%84%9C%EC%9A%B8%22%5D%2C%5B%5D%5D");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1]["groupIndex"], 1);
        assert_eq!(body["data"][1]["data"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn malformed_input_is_a_client_error() {
        let temp = seeded().await;
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        for uri in [
            "/api/statistics/compare",
            "/api/statistics/compare?groups=nope",
            "/api/statistics/summary?year=abc",
            "/api/statistics/map?schoolLevel=unknown",
            "/api/schools?page=0",
            "/api/statistics?limit=-5",
            "/api/statistics?year=2024&year=2025",
            "/api/statistics/compare?groups=%5B%5B%5D%2C%5B%5D%2C%5B%5D%2C%5B%5D%2C%5B%5D%2C%5B%5D%5D",
        ] {
            let (status, body) = get!(app, uri);
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["success"], false, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[actix_web::test]
    async fn empty_params_are_ignored() {
        let temp = seeded().await;
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        let (status, body) = get!(app, "/api/statistics?year=&sido=&schoolLevel=");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["limit"], 100);
    }

    #[actix_web::test]
    async fn regions_and_map() {
        let temp = seeded().await;
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        let (_, body) = get!(app, "/api/regions");
        assert_eq!(body["data"]["sidos"], serde_json::json!(["서울"]));
        assert_eq!(body["data"]["years"], serde_json::json!([2025, 2024]));

        let (_, body) = get!(app, "/api/statistics/map");
        assert_eq!(body["data"]["meta"]["totalRegions"], 1);
        assert_eq!(body["data"]["meta"]["maxStudents"], 90);
        assert_eq!(body["data"]["meta"]["minStudents"], 90);
        assert_eq!(body["data"]["data"][0]["displayName"], "서울특별시");
    }

    #[actix_web::test]
    async fn schools_and_detail() {
        let temp = seeded().await;
        let app = test::init_service(App::new().app_data(state(&temp)).configure(configure_api)).await;

        let (status, body) = get!(app, "/api/schools");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["schoolName"], "대치초등학교");
        assert_eq!(body["data"][0]["totalStudents"], 90);
        assert_eq!(body["pagination"]["limit"], 20);
        assert_eq!(body["pagination"]["totalPages"], 1);

        let (status, body) = get!(app, "/api/schools/%EB%8C%80%EC%B9%98%EC%B4%88%EB%93%B1%ED%95%99%EA%B5%90/detail");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["school"]["sigungu"], "강남구");
        assert_eq!(body["data"]["grades"][0]["grade"], 1);
        assert_eq!(body["data"]["grades"][1]["totalStudents"], 40);

        let (_, body) = get!(app, "/api/schools/unknown/detail");
        assert!(body["data"]["school"].is_null());
    }
}
