use serde::Serialize;

use crate::models::{
    Priority, Project, Requirement, RequirementLevel, RequirementStatus, RequirementType,
};

/// Criteria for narrowing a project's requirement list
///
/// Unset criteria match everything. The search text is matched
/// case-insensitively against title, description and code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementFilter {
    pub search: Option<String>,
    pub req_type: Option<RequirementType>,
    pub priority: Option<Priority>,
    pub level: Option<RequirementLevel>,
    pub status: Option<RequirementStatus>,
}

impl RequirementFilter {
    pub fn matches(&self, req: &Requirement) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = req.title.to_lowercase().contains(&needle)
                || req.description.to_lowercase().contains(&needle)
                || req.code.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        self.req_type.map_or(true, |t| req.req_type == Some(t))
            && self.priority.map_or(true, |p| req.priority == p)
            && self.level.map_or(true, |l| req.level == Some(l))
            && self.status.map_or(true, |s| req.status == s)
    }

    pub fn apply<'a>(&self, requirements: &'a [Requirement]) -> Vec<&'a Requirement> {
        requirements.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Requirement totals for one project, by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequirementCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub rejected: usize,
}

impl RequirementCounts {
    pub fn of(project: &Project) -> Self {
        project
            .requirements
            .iter()
            .fold(Self::default(), |mut counts, req| {
                counts.total += 1;
                match req.status {
                    RequirementStatus::Pending => counts.pending += 1,
                    RequirementStatus::InProgress => counts.in_progress += 1,
                    RequirementStatus::Completed => counts.completed += 1,
                    RequirementStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Actor, EntityId};
    use crate::seed::seed_store;

    fn website() -> Project {
        let store = seed_store(Actor::default());
        store.project(&EntityId::from("1")).unwrap().clone()
    }

    fn codes(reqs: Vec<&Requirement>) -> Vec<String> {
        reqs.into_iter().map(|r| r.code.clone()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let project = website();
        let filter = RequirementFilter::default();
        assert_eq!(filter.apply(&project.requirements).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let project = website();

        let by_title = RequirementFilter {
            search: Some("seo".into()),
            ..Default::default()
        };
        assert_eq!(codes(by_title.apply(&project.requirements)), vec!["REQ-002"]);

        let by_code = RequirementFilter {
            search: Some("req-003".into()),
            ..Default::default()
        };
        assert_eq!(codes(by_code.apply(&project.requirements)), vec!["REQ-003"]);

        let by_description = RequirementFilter {
            search: Some("MOBILE-FRIENDLY".into()),
            ..Default::default()
        };
        assert_eq!(codes(by_description.apply(&project.requirements)), vec!["REQ-001"]);
    }

    #[test]
    fn test_criteria_combine() {
        let project = website();
        let filter = RequirementFilter {
            req_type: Some(RequirementType::NonFunctional),
            level: Some(RequirementLevel::System),
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert_eq!(codes(filter.apply(&project.requirements)), vec!["REQ-001", "REQ-002"]);

        let none = RequirementFilter {
            level: Some(RequirementLevel::Component),
            ..Default::default()
        };
        assert!(none.apply(&project.requirements).is_empty());
    }

    #[test]
    fn test_counts() {
        let counts = RequirementCounts::of(&website());
        assert_eq!(
            counts,
            RequirementCounts {
                total: 3,
                pending: 1,
                in_progress: 1,
                completed: 1,
                rejected: 0,
            }
        );
    }
}
