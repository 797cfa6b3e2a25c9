//! Routing table: abstract paths to views

use std::fmt;

use crate::models::EntityId;

/// One view of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Sign-in view; the only route open without a session
    Auth,
    /// Active project list
    Projects,
    NewProject,
    ProjectDetail(EntityId),
    EditProject(EntityId),
    RequirementDetail {
        project_id: EntityId,
        requirement_id: EntityId,
    },
    /// Soft-deleted project list
    Deleted,
    Settings,
    NotFound(String),
}

impl Route {
    /// Maps a path to its route; unknown paths map to `NotFound`
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Projects,
            ["auth"] => Route::Auth,
            ["deleted"] => Route::Deleted,
            ["settings"] => Route::Settings,
            ["project", "new"] => Route::NewProject,
            ["project", id] => Route::ProjectDetail(EntityId::from(*id)),
            ["project", id, "edit"] => Route::EditProject(EntityId::from(*id)),
            ["project", project_id, "requirement", requirement_id] => Route::RequirementDetail {
                project_id: EntityId::from(*project_id),
                requirement_id: EntityId::from(*requirement_id),
            },
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    /// Renders the canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Auth => "/auth".to_string(),
            Route::Projects => "/".to_string(),
            Route::NewProject => "/project/new".to_string(),
            Route::ProjectDetail(id) => format!("/project/{}", id),
            Route::EditProject(id) => format!("/project/{}/edit", id),
            Route::RequirementDetail {
                project_id,
                requirement_id,
            } => format!("/project/{}/requirement/{}", project_id, requirement_id),
            Route::Deleted => "/deleted".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Every route but sign-in (and the not-found page) needs a session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Auth | Route::NotFound(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Projects);
        assert_eq!(Route::parse(""), Route::Projects);
        assert_eq!(Route::parse("/auth"), Route::Auth);
        assert_eq!(Route::parse("/deleted/"), Route::Deleted);
        assert_eq!(Route::parse("/project/new"), Route::NewProject);
        assert_eq!(Route::parse("/project/1"), Route::ProjectDetail("1".into()));
        assert_eq!(Route::parse("/project/1/edit"), Route::EditProject("1".into()));
        assert_eq!(
            Route::parse("/project/2/requirement/1"),
            Route::RequirementDetail {
                project_id: "2".into(),
                requirement_id: "1".into(),
            }
        );
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(
            Route::parse("/project/1/team"),
            Route::NotFound("/project/1/team".into())
        );
        assert!(!Route::parse("/nope").requires_session());
    }

    #[test]
    fn test_paths_round_trip() {
        let routes = [
            Route::Auth,
            Route::Projects,
            Route::NewProject,
            Route::ProjectDetail("42".into()),
            Route::EditProject("42".into()),
            Route::RequirementDetail {
                project_id: "42".into(),
                requirement_id: "7".into(),
            },
            Route::Deleted,
            Route::Settings,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_session_gating() {
        assert!(!Route::Auth.requires_session());
        assert!(Route::Projects.requires_session());
        assert!(Route::Settings.requires_session());
    }
}
