//! Query-string parsing and defaulting.
//!
//! Every parser treats an empty string the same as an absent parameter
//! and reports malformed input as [`ApiError::BadRequest`].

use edustats_school_models::SchoolLevel;

use crate::error::ApiError;

/// Default page size for `/statistics`.
pub const DEFAULT_STATISTICS_LIMIT: u32 = 100;

/// Default page size for `/schools`.
pub const DEFAULT_SCHOOLS_LIMIT: u32 = 20;

/// Largest accepted page size; larger requests are clamped.
pub const MAX_LIMIT: u32 = 1000;

/// Most comparison groups accepted in one request.
pub const MAX_COMPARE_GROUPS: usize = 5;

/// Most provinces accepted in one comparison group (one per si-do).
pub const MAX_GROUP_REGIONS: usize = 17;

/// Returns the parameter unless it is absent or empty.
pub fn present(raw: Option<&String>) -> Option<&str> {
    raw.map(String::as_str).filter(|s| !s.is_empty())
}

/// Owned variant of [`present`] for string filters.
pub fn text(raw: Option<&String>) -> Option<String> {
    present(raw).map(str::to_string)
}

/// Parses an optional year.
pub fn year(raw: Option<&String>) -> Result<Option<i32>, ApiError> {
    present(raw)
        .map(|s| {
            s.trim()
                .parse::<i32>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid year: '{s}'")))
        })
        .transpose()
}

/// Parses a year, falling back to `default` when absent.
pub fn year_or(raw: Option<&String>, default: i32) -> Result<i32, ApiError> {
    Ok(year(raw)?.unwrap_or(default))
}

/// Parses an optional school level name.
pub fn school_level(raw: Option<&String>) -> Result<Option<SchoolLevel>, ApiError> {
    present(raw)
        .map(|s| SchoolLevel::from_name(s).map_err(|e| ApiError::BadRequest(e.to_string())))
        .transpose()
}

fn positive(name: &str, raw: &str) -> Result<u32, ApiError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::BadRequest(format!(
            "Invalid {name}: '{raw}' (must be a positive integer)"
        ))),
    }
}

/// Parses a 1-indexed page, defaulting to 1.
pub fn page(raw: Option<&String>) -> Result<u32, ApiError> {
    present(raw).map_or(Ok(1), |s| positive("page", s))
}

/// Parses a page size, defaulting to `default` and clamping to
/// [`MAX_LIMIT`].
pub fn limit(raw: Option<&String>, default: u32) -> Result<u32, ApiError> {
    let value = present(raw).map_or(Ok(default), |s| positive("limit", s))?;
    Ok(value.min(MAX_LIMIT))
}

/// Parses the JSON-encoded comparison groups, capped at
/// [`MAX_COMPARE_GROUPS`] groups of at most [`MAX_GROUP_REGIONS`] provinces.
pub fn groups(raw: Option<&String>) -> Result<Vec<Vec<String>>, ApiError> {
    let raw = present(raw)
        .ok_or_else(|| ApiError::BadRequest("groups parameter is required".to_string()))?;
    let groups: Vec<Vec<String>> = serde_json::from_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid groups parameter: {e}")))?;

    if groups.len() > MAX_COMPARE_GROUPS {
        return Err(ApiError::BadRequest(format!(
            "Too many groups: {} (at most {MAX_COMPARE_GROUPS})",
            groups.len()
        )));
    }
    if let Some((index, group)) = groups
        .iter()
        .enumerate()
        .find(|(_, group)| group.len() > MAX_GROUP_REGIONS)
    {
        return Err(ApiError::BadRequest(format!(
            "Too many regions in group {index}: {} (at most {MAX_GROUP_REGIONS})",
            group.len()
        )));
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn empty_strings_are_absent() {
        assert_eq!(year(s("").as_ref()).unwrap(), None);
        assert_eq!(school_level(s("").as_ref()).unwrap(), None);
        assert_eq!(text(s("").as_ref()), None);
        assert_eq!(page(s("").as_ref()).unwrap(), 1);
    }

    #[test]
    fn year_defaults_and_rejects_garbage() {
        assert_eq!(year_or(None, 2025).unwrap(), 2025);
        assert_eq!(year_or(s("2023").as_ref(), 2025).unwrap(), 2023);
        assert!(matches!(year(s("twenty").as_ref()), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn school_level_must_be_known() {
        assert_eq!(
            school_level(s("중학교").as_ref()).unwrap(),
            Some(SchoolLevel::Middle)
        );
        assert!(school_level(s("대학교").as_ref()).is_err());
    }

    #[test]
    fn page_and_limit_bounds() {
        assert!(page(s("0").as_ref()).is_err());
        assert!(page(s("-1").as_ref()).is_err());
        assert_eq!(page(s("3").as_ref()).unwrap(), 3);

        assert_eq!(limit(None, DEFAULT_SCHOOLS_LIMIT).unwrap(), 20);
        assert_eq!(limit(s("5000").as_ref(), DEFAULT_SCHOOLS_LIMIT).unwrap(), MAX_LIMIT);
        assert!(limit(s("0").as_ref(), DEFAULT_SCHOOLS_LIMIT).is_err());
    }

    #[test]
    fn groups_are_json_lists() {
        assert_eq!(
            groups(s(r#"[["서울"],[]]"#).as_ref()).unwrap(),
            vec![vec!["서울".to_string()], vec![]]
        );
        assert!(groups(None).is_err());
        assert!(groups(s("not json").as_ref()).is_err());
        assert!(groups(s(r#"{"a":1}"#).as_ref()).is_err());
    }

    #[test]
    fn groups_are_bounded() {
        assert_eq!(groups(s("[[],[],[],[],[]]").as_ref()).unwrap().len(), 5);
        assert!(matches!(
            groups(s("[[],[],[],[],[],[]]").as_ref()),
            Err(ApiError::BadRequest(_))
        ));

        let crowded = serde_json::to_string(&vec![vec!["서울"; MAX_GROUP_REGIONS + 1]]).unwrap();
        assert!(matches!(groups(Some(&crowded)), Err(ApiError::BadRequest(_))));
    }
}
