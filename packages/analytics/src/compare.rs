//! Multi-group yearly comparison.

use edustats_analytics_models::{CompareGroupResult, CompareParams};
use edustats_database_models::{Column, Predicate};
use futures::future::try_join_all;
use switchy_database::Database;

use crate::AnalyticsError;
use crate::trend::trend_for;

/// Computes a yearly series for each group, summing over the group's
/// provinces.
///
/// Groups are queried concurrently and returned in request order. An empty
/// group yields an empty series without querying. If any group fails the
/// whole comparison fails.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if any group's query fails.
pub async fn compare(
    db: &dyn Database,
    params: &CompareParams,
) -> Result<Vec<CompareGroupResult>, AnalyticsError> {
    log::debug!("Comparing {} groups", params.groups.len());

    let futures = params.groups.iter().enumerate().map(|(group_index, regions)| async move {
        let data = if regions.is_empty() {
            vec![]
        } else {
            let predicate = Predicate::new()
                .where_in(Column::Sido, regions.iter().map(String::as_str))
                .where_eq_opt(Column::SchoolLevel, params.school_level);
            trend_for(db, &predicate).await?
        };

        Ok::<_, AnalyticsError>(CompareGroupResult {
            group_index,
            regions: regions.clone(),
            data,
        })
    });

    try_join_all(futures).await
}
