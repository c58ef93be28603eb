//! Named province groups for the region comparison chart.

use edustats_analytics_models::CompareParams;
use edustats_school_models::SchoolLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum number of groups.
pub const DEFAULT_MAX_GROUPS: usize = 5;

/// Colors assigned to new groups, cycling by group count.
pub const GROUP_COLORS: &[&str] = &["#3b82f6", "#ef4444", "#22c55e", "#f59e0b", "#8b5cf6"];

/// Rejected group mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// The group cap has been reached.
    #[error("At most {max} comparison groups are allowed")]
    LimitReached {
        /// The configured cap.
        max: usize,
    },

    /// The group name is empty after trimming.
    #[error("Group name must not be blank")]
    BlankName,

    /// No group has the given id.
    #[error("Unknown comparison group: {id}")]
    UnknownGroup {
        /// The id that was looked up.
        id: String,
    },
}

/// A named set of provinces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonGroup {
    /// UUID assigned on creation.
    pub id: String,
    /// Display name, trimmed.
    pub name: String,
    /// Color token.
    pub color: String,
    /// Provinces in insertion order, without duplicates.
    pub regions: Vec<String>,
}

/// Whether the groups are ready to be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonRequest {
    /// Region lists of every non-empty group, in group order.
    Ready(Vec<Vec<String>>),
    /// Fewer than two groups have regions.
    Insufficient {
        /// Number of non-empty groups.
        ready: usize,
    },
}

/// The comparison groups, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonGroups {
    groups: Vec<ComparisonGroup>,
    max_groups: usize,
}

impl Default for ComparisonGroups {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GROUPS)
    }
}

impl ComparisonGroups {
    /// An empty collection holding at most `max_groups` groups.
    #[must_use]
    pub const fn new(max_groups: usize) -> Self {
        Self {
            groups: Vec::new(),
            max_groups,
        }
    }

    /// The groups, in insertion order.
    #[must_use]
    pub fn groups(&self) -> &[ComparisonGroup] {
        &self.groups
    }

    /// Looks up a group by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ComparisonGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Whether another group can be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.groups.len() >= self.max_groups
    }

    /// The color the next group should get.
    #[must_use]
    pub fn next_color(&self) -> &'static str {
        GROUP_COLORS[self.groups.len() % GROUP_COLORS.len()]
    }

    /// Adds an empty group and returns its id.
    ///
    /// # Errors
    ///
    /// * [`GroupError::BlankName`] if `name` is blank
    /// * [`GroupError::LimitReached`] if the cap is reached
    pub fn add_group(&mut self, name: &str, color: &str) -> Result<String, GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::BlankName);
        }
        if self.is_full() {
            return Err(GroupError::LimitReached {
                max: self.max_groups,
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        log::debug!("Adding comparison group '{name}' ({id})");
        self.groups.push(ComparisonGroup {
            id: id.clone(),
            name: name.to_string(),
            color: color.to_string(),
            regions: Vec::new(),
        });
        Ok(id)
    }

    /// Removes a group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::UnknownGroup`] if no group has `id`.
    pub fn remove_group(&mut self, id: &str) -> Result<ComparisonGroup, GroupError> {
        let index = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| GroupError::UnknownGroup { id: id.to_string() })?;
        Ok(self.groups.remove(index))
    }

    /// Adds a province to a group. Returns `false` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::UnknownGroup`] if no group has `id`.
    pub fn add_region_to_group(&mut self, id: &str, region: &str) -> Result<bool, GroupError> {
        let group = self.group_mut(id)?;
        if group.regions.iter().any(|r| r == region) {
            return Ok(false);
        }
        group.regions.push(region.to_string());
        Ok(true)
    }

    /// Removes a province from a group. Returns `false` if it was absent.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::UnknownGroup`] if no group has `id`.
    pub fn remove_region_from_group(&mut self, id: &str, region: &str) -> Result<bool, GroupError> {
        let group = self.group_mut(id)?;
        let before = group.regions.len();
        group.regions.retain(|r| r != region);
        Ok(group.regions.len() != before)
    }

    /// Removes every group.
    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    /// Groups that have at least one province, in order.
    pub fn ready_groups(&self) -> impl Iterator<Item = &ComparisonGroup> {
        self.groups.iter().filter(|g| !g.regions.is_empty())
    }

    /// The region lists to compare, once at least two groups have regions.
    #[must_use]
    pub fn comparison_request(&self) -> ComparisonRequest {
        let lists: Vec<Vec<String>> = self.ready_groups().map(|g| g.regions.clone()).collect();
        if lists.len() < 2 {
            ComparisonRequest::Insufficient { ready: lists.len() }
        } else {
            ComparisonRequest::Ready(lists)
        }
    }

    /// Query parameters for the comparison, or `None` while fewer than two
    /// groups have regions.
    #[must_use]
    pub fn compare_params(&self, school_level: Option<SchoolLevel>) -> Option<CompareParams> {
        match self.comparison_request() {
            ComparisonRequest::Ready(groups) => Some(CompareParams {
                groups,
                school_level,
            }),
            ComparisonRequest::Insufficient { .. } => None,
        }
    }

    fn group_mut(&mut self, id: &str) -> Result<&mut ComparisonGroup, GroupError> {
        self.groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| GroupError::UnknownGroup { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_group_trims_and_assigns_unique_ids() {
        let mut groups = ComparisonGroups::default();
        let a = groups.add_group("  수도권 ", "#3b82f6").unwrap();
        let b = groups.add_group("영남", "#ef4444").unwrap();

        assert_ne!(a, b);
        assert_eq!(groups.get(&a).unwrap().name, "수도권");
        assert!(groups.get(&a).unwrap().regions.is_empty());
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut groups = ComparisonGroups::default();
        assert_eq!(groups.add_group("   ", "#3b82f6"), Err(GroupError::BlankName));
        assert!(groups.groups().is_empty());
    }

    #[test]
    fn cap_is_enforced() {
        let mut groups = ComparisonGroups::new(2);
        groups.add_group("a", "#3b82f6").unwrap();
        groups.add_group("b", "#ef4444").unwrap();
        assert!(groups.is_full());
        assert_eq!(
            groups.add_group("c", "#22c55e"),
            Err(GroupError::LimitReached { max: 2 })
        );
    }

    #[test]
    fn colors_cycle_with_group_count() {
        let mut groups = ComparisonGroups::new(10);
        assert_eq!(groups.next_color(), GROUP_COLORS[0]);
        for i in 0..GROUP_COLORS.len() {
            let color = groups.next_color();
            groups.add_group(&format!("g{i}"), color).unwrap();
        }
        assert_eq!(groups.next_color(), GROUP_COLORS[0]);
        assert_eq!(groups.groups()[1].color, GROUP_COLORS[1]);
    }

    #[test]
    fn adding_a_region_twice_is_a_no_op() {
        let mut groups = ComparisonGroups::default();
        let id = groups.add_group("수도권", "#3b82f6").unwrap();

        assert!(groups.add_region_to_group(&id, "서울").unwrap());
        assert!(!groups.add_region_to_group(&id, "서울").unwrap());
        assert!(groups.add_region_to_group(&id, "경기").unwrap());
        assert_eq!(groups.get(&id).unwrap().regions, vec!["서울", "경기"]);

        assert!(groups.remove_region_from_group(&id, "서울").unwrap());
        assert!(!groups.remove_region_from_group(&id, "서울").unwrap());
        assert_eq!(groups.get(&id).unwrap().regions, vec!["경기"]);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut groups = ComparisonGroups::default();
        assert!(matches!(
            groups.add_region_to_group("missing", "서울"),
            Err(GroupError::UnknownGroup { .. })
        ));
        assert!(groups.remove_group("missing").is_err());
    }

    #[test]
    fn request_needs_two_non_empty_groups() {
        let mut groups = ComparisonGroups::default();
        let a = groups.add_group("a", "#3b82f6").unwrap();
        let b = groups.add_group("b", "#ef4444").unwrap();
        groups.add_group("empty", "#22c55e").unwrap();

        assert_eq!(
            groups.comparison_request(),
            ComparisonRequest::Insufficient { ready: 0 }
        );

        groups.add_region_to_group(&a, "서울").unwrap();
        assert_eq!(
            groups.comparison_request(),
            ComparisonRequest::Insufficient { ready: 1 }
        );
        assert!(groups.compare_params(None).is_none());

        groups.add_region_to_group(&b, "부산").unwrap();
        groups.add_region_to_group(&b, "대구").unwrap();
        assert_eq!(
            groups.comparison_request(),
            ComparisonRequest::Ready(vec![
                vec!["서울".to_string()],
                vec!["부산".to_string(), "대구".to_string()],
            ])
        );

        let params = groups.compare_params(Some(SchoolLevel::High)).unwrap();
        assert_eq!(params.groups.len(), 2);
        assert_eq!(params.school_level, Some(SchoolLevel::High));
    }

    #[test]
    fn remove_and_clear() {
        let mut groups = ComparisonGroups::default();
        let a = groups.add_group("a", "#3b82f6").unwrap();
        groups.add_group("b", "#ef4444").unwrap();

        assert_eq!(groups.remove_group(&a).unwrap().name, "a");
        assert_eq!(groups.groups().len(), 1);

        groups.clear_groups();
        assert!(groups.groups().is_empty());
    }
}
