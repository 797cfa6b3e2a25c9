//! In-memory domain store for projects and everything they own
//!
//! The store holds two top-level collections, active and soft-deleted
//! projects, and is the only sanctioned way to mutate them. Each successful
//! mutation installs a new root vector: untouched projects stay shared behind
//! their `Arc`, the touched project is replaced by a new value. Consumers can
//! therefore detect change by comparing [`Snapshot`]s by reference.
//!
//! Missing identities are never an error. Every operation reports whether it
//! did anything (`bool` or `Option`) and otherwise leaves the store untouched.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{
    ActivityAction, ActivityLog, Actor, Comment, CommentDraft, EntityId, FieldChange, Project,
    ProjectDraft, ProjectPatch, Requirement, RequirementDraft, RequirementPatch, TeamMember,
    TeamMemberDraft, TeamMemberPatch,
};

type Collection = Arc<Vec<Arc<Project>>>;

/// Read-only view of both collections at one revision
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub active: Arc<Vec<Arc<Project>>>,
    pub deleted: Arc<Vec<Arc<Project>>>,
    pub revision: u64,
}

impl Snapshot {
    /// True when both roots are the very same allocations as `other`'s
    pub fn is_same(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.active, &other.active) && Arc::ptr_eq(&self.deleted, &other.deleted)
    }
}

/// Owner of the active and deleted project collections
#[derive(Debug, Clone)]
pub struct ProjectStore {
    active: Collection,
    deleted: Collection,
    actor: Actor,
    revision: u64,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new(Actor::default())
    }
}

impl ProjectStore {
    /// Creates an empty store whose activity entries are attributed to `actor`
    pub fn new(actor: Actor) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), actor)
    }

    /// Creates a store from pre-built collections (used for seeding)
    pub fn from_parts(active: Vec<Project>, deleted: Vec<Project>, actor: Actor) -> Self {
        Self {
            active: Arc::new(active.into_iter().map(Arc::new).collect()),
            deleted: Arc::new(deleted.into_iter().map(Arc::new).collect()),
            actor,
            revision: 0,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active: Arc::clone(&self.active),
            deleted: Arc::clone(&self.deleted),
            revision: self.revision,
        }
    }

    /// Number of successful mutations applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Changes who new activity entries are attributed to
    pub fn set_actor(&mut self, actor: Actor) {
        self.actor = actor;
    }

    pub fn projects(&self) -> &[Arc<Project>] {
        &self.active
    }

    pub fn deleted_projects(&self) -> &[Arc<Project>] {
        &self.deleted
    }

    /// Gets an active project by ID
    pub fn project(&self, id: &EntityId) -> Option<&Project> {
        self.active.iter().find(|p| p.id == *id).map(|p| p.as_ref())
    }

    /// Gets a soft-deleted project by ID
    pub fn deleted_project(&self, id: &EntityId) -> Option<&Project> {
        self.deleted.iter().find(|p| p.id == *id).map(|p| p.as_ref())
    }

    pub fn requirement(&self, project_id: &EntityId, req_id: &EntityId) -> Option<&Requirement> {
        self.project(project_id)?.requirement(req_id)
    }

    /// Gets a requirement of an active project by ID or code
    pub fn find_requirement(&self, project_id: &EntityId, key: &str) -> Option<&Requirement> {
        self.project(project_id)?.find_requirement(key)
    }

    // =========================================================================
    // Project operations
    // =========================================================================

    /// Appends a new project to the active collection
    pub fn create_project(&mut self, draft: ProjectDraft) -> EntityId {
        let now = Utc::now();
        let project = Project {
            id: EntityId::generate(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            created_at: now,
            deleted_at: None,
            requirements: Vec::new(),
            team: Vec::new(),
            comments: Vec::new(),
            activity_log: vec![ActivityLog::new(
                ActivityAction::Created,
                &self.actor,
                "Project created",
            )],
            next_requirement_number: 1,
        };
        let id = project.id.clone();
        info!(project = %id, name = %project.name, "project created");

        let mut next = Vec::clone(&self.active);
        next.push(Arc::new(project));
        self.active = Arc::new(next);
        self.revision += 1;
        id
    }

    /// Merges `patch` into an active project
    pub fn update_project(&mut self, id: &EntityId, patch: &ProjectPatch) -> bool {
        let actor = self.actor.clone();
        self.modify_active(id, |project| {
            let changes = patch.apply(project);
            if !changes.is_empty() {
                project.activity_log.push(edit_entry(&actor, "Project updated", changes));
            }
            Some(())
        })
        .is_some()
    }

    /// Moves a project from the active to the deleted collection
    pub fn soft_delete_project(&mut self, id: &EntityId) -> bool {
        let Some(pos) = self.active.iter().position(|p| p.id == *id) else {
            debug!(project = %id, "soft delete ignored: project not active");
            return false;
        };

        let mut active = Vec::clone(&self.active);
        let mut project = Project::clone(&active.remove(pos));
        project.deleted_at = Some(Utc::now());

        let mut deleted = Vec::clone(&self.deleted);
        deleted.push(Arc::new(project));

        self.active = Arc::new(active);
        self.deleted = Arc::new(deleted);
        self.revision += 1;
        info!(project = %id, "project moved to trash");
        true
    }

    /// Moves a project from the deleted collection back to the active one
    pub fn restore_project(&mut self, id: &EntityId) -> bool {
        let Some(pos) = self.deleted.iter().position(|p| p.id == *id) else {
            debug!(project = %id, "restore ignored: project not in trash");
            return false;
        };

        let mut deleted = Vec::clone(&self.deleted);
        let mut project = Project::clone(&deleted.remove(pos));
        project.deleted_at = None;

        let mut active = Vec::clone(&self.active);
        active.push(Arc::new(project));

        self.active = Arc::new(active);
        self.deleted = Arc::new(deleted);
        self.revision += 1;
        info!(project = %id, "project restored");
        true
    }

    /// Permanently removes a project from the deleted collection
    pub fn purge_project(&mut self, id: &EntityId) -> bool {
        if !self.deleted.iter().any(|p| p.id == *id) {
            debug!(project = %id, "purge ignored: project not in trash");
            return false;
        }

        let next: Vec<_> = self.deleted.iter().filter(|p| p.id != *id).cloned().collect();
        self.deleted = Arc::new(next);
        self.revision += 1;
        info!(project = %id, "project purged");
        true
    }

    // =========================================================================
    // Requirement operations
    // =========================================================================

    /// Appends a requirement to an active project, assigning its code
    pub fn create_requirement(
        &mut self,
        project_id: &EntityId,
        draft: RequirementDraft,
    ) -> Option<EntityId> {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let statement = if draft.statement.trim().is_empty() {
                draft.description.clone()
            } else {
                draft.statement
            };
            let req = Requirement {
                id: EntityId::generate(),
                code: project.take_requirement_code(),
                title: draft.title,
                statement,
                description: draft.description,
                rationale: draft.rationale,
                risk: draft.risk,
                level: draft.level,
                req_type: draft.req_type,
                status: draft.status,
                priority: draft.priority,
                created_at: Utc::now(),
                updated_at: None,
                comments: Vec::new(),
                activity_log: vec![ActivityLog::new(
                    ActivityAction::Created,
                    &actor,
                    "Requirement created",
                )],
            };
            info!(project = %project.id, code = %req.code, "requirement created");
            let id = req.id.clone();
            project.requirements.push(req);
            Some(id)
        })
    }

    /// Merges `patch` into a requirement and stamps its update time
    pub fn update_requirement(
        &mut self,
        project_id: &EntityId,
        req_id: &EntityId,
        patch: &RequirementPatch,
    ) -> bool {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let req = project.requirements.iter_mut().find(|r| r.id == *req_id)?;
            let changes = patch.apply(req);
            let previous = req.updated_at.unwrap_or(req.created_at);
            req.updated_at = Some(not_before(previous));
            if !changes.is_empty() {
                req.activity_log.push(edit_entry(&actor, "Requirement updated", changes));
            }
            Some(())
        })
        .is_some()
    }

    /// Removes a requirement from its project; there is no trash for requirements
    pub fn delete_requirement(&mut self, project_id: &EntityId, req_id: &EntityId) -> bool {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let pos = project.requirements.iter().position(|r| r.id == *req_id)?;
            let removed = project.requirements.remove(pos);
            project.activity_log.push(ActivityLog::new(
                ActivityAction::Deleted,
                &actor,
                format!("Requirement {} deleted", removed.code),
            ));
            Some(())
        })
        .is_some()
    }

    // =========================================================================
    // Team operations
    // =========================================================================

    pub fn add_team_member(
        &mut self,
        project_id: &EntityId,
        draft: TeamMemberDraft,
    ) -> Option<EntityId> {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let member = TeamMember {
                id: EntityId::generate(),
                user_id: draft.user_id,
                name: draft.name,
                email: draft.email,
                avatar: draft.avatar,
                role: draft.role,
                joined_at: Utc::now(),
            };
            project.activity_log.push(ActivityLog::new(
                ActivityAction::Created,
                &actor,
                format!("Team member {} added as {}", member.name, member.role),
            ));
            let id = member.id.clone();
            project.team.push(member);
            Some(id)
        })
    }

    pub fn update_team_member(
        &mut self,
        project_id: &EntityId,
        member_id: &EntityId,
        patch: &TeamMemberPatch,
    ) -> bool {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let member = project.team.iter_mut().find(|m| m.id == *member_id)?;
            let changes = patch.apply(member);
            if !changes.is_empty() {
                let action = if changes.iter().any(|c| c.field == "role") {
                    ActivityAction::Assigned
                } else {
                    ActivityAction::Edited
                };
                let details = format!("Team member {} updated", member.name);
                project
                    .activity_log
                    .push(ActivityLog::new(action, &actor, details).with_changes(changes));
            }
            Some(())
        })
        .is_some()
    }

    pub fn remove_team_member(&mut self, project_id: &EntityId, member_id: &EntityId) -> bool {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let pos = project.team.iter().position(|m| m.id == *member_id)?;
            let removed = project.team.remove(pos);
            project.activity_log.push(ActivityLog::new(
                ActivityAction::Deleted,
                &actor,
                format!("Team member {} removed", removed.name),
            ));
            Some(())
        })
        .is_some()
    }

    // =========================================================================
    // Comment operations
    // =========================================================================

    /// Adds a comment to a project, or to one of its requirements
    ///
    /// The draft's parent reference is stored as given.
    pub fn add_comment(
        &mut self,
        project_id: &EntityId,
        requirement_id: Option<&EntityId>,
        draft: CommentDraft,
    ) -> Option<EntityId> {
        let actor = self.actor.clone();
        self.modify_active(project_id, |project| {
            let comment = Comment {
                id: EntityId::generate(),
                author_id: draft.author_id,
                author_name: draft.author_name,
                author_avatar: draft.author_avatar,
                content: draft.content,
                created_at: Utc::now(),
                parent_id: draft.parent_id,
            };
            let id = comment.id.clone();
            let details = if comment.is_reply() {
                "Replied to a comment"
            } else {
                "Added a comment"
            };
            let entry = ActivityLog::new(ActivityAction::Commented, &actor, details);

            match requirement_id {
                Some(req_id) => {
                    let req = project.requirements.iter_mut().find(|r| r.id == *req_id)?;
                    req.comments.push(comment);
                    req.activity_log.push(entry);
                }
                None => {
                    project.comments.push(comment);
                    project.activity_log.push(entry);
                }
            }
            Some(id)
        })
    }

    /// Removes a comment together with every reply beneath it
    pub fn delete_comment(
        &mut self,
        project_id: &EntityId,
        requirement_id: Option<&EntityId>,
        comment_id: &EntityId,
    ) -> bool {
        self.modify_active(project_id, |project| {
            let comments = match requirement_id {
                Some(req_id) => {
                    &mut project.requirements.iter_mut().find(|r| r.id == *req_id)?.comments
                }
                None => &mut project.comments,
            };
            if !comments.iter().any(|c| c.id == *comment_id) {
                return None;
            }

            let doomed = crate::comments::CommentThread::build(comments).descendants(comment_id);
            comments.retain(|c| c.id != *comment_id && !doomed.contains(&c.id));
            Some(())
        })
        .is_some()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Applies `f` to a copy of an active project and installs the copy
    ///
    /// When the project is missing or `f` returns `None` the store is left
    /// exactly as it was, roots and revision included.
    fn modify_active<R>(
        &mut self,
        id: &EntityId,
        f: impl FnOnce(&mut Project) -> Option<R>,
    ) -> Option<R> {
        let Some(pos) = self.active.iter().position(|p| p.id == *id) else {
            debug!(project = %id, "ignored: project not active");
            return None;
        };

        let mut project = Project::clone(&self.active[pos]);
        let Some(result) = f(&mut project) else {
            debug!(project = %id, "ignored: target not found in project");
            return None;
        };

        let mut next = Vec::clone(&self.active);
        next[pos] = Arc::new(project);
        self.active = Arc::new(next);
        self.revision += 1;
        Some(result)
    }
}

/// Builds an `edited` entry, or `status_changed` when status is the only change
fn edit_entry(actor: &Actor, details: &str, changes: Vec<FieldChange>) -> ActivityLog {
    let action = if changes.len() == 1 && changes[0].field == "status" {
        ActivityAction::StatusChanged
    } else {
        ActivityAction::Edited
    };
    ActivityLog::new(action, actor, details).with_changes(changes)
}

/// Current time, clamped so it never precedes `previous`
fn not_before(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberRole, ProjectStatus, RequirementStatus};
    use crate::seed::seed_store;
    use chrono::{Duration, NaiveDate};

    fn draft(name: &str) -> ProjectDraft {
        ProjectDraft::new(
            name,
            "Complete overhaul of company website",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    fn store_with_project() -> (ProjectStore, EntityId) {
        let mut store = ProjectStore::default();
        let id = store.create_project(draft("Website Redesign"));
        (store, id)
    }

    fn ids(projects: &[Arc<Project>]) -> Vec<String> {
        projects.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_create_project() {
        let mut store = seed_store(Actor::default());
        let before = store.projects().len();

        let id = store.create_project(draft("Website Redesign"));

        assert_eq!(store.projects().len(), before + 1);
        assert!(!id.as_str().is_empty());
        let others = store.projects().iter().filter(|p| p.id == id).count()
            + store.deleted_projects().iter().filter(|p| p.id == id).count();
        assert_eq!(others, 1);

        let project = store.project(&id).unwrap();
        assert_eq!(project.activity_log.len(), 1);
        assert_eq!(project.activity_log[0].action, ActivityAction::Created);
        assert_eq!(project.activity_log[0].performed_by, "Current User");
        assert!(project.requirements.is_empty());
        assert!(project.team.is_empty());
        assert!(project.deleted_at.is_none());
    }

    #[test]
    fn test_website_redesign_scenario() {
        let (mut store, project_id) = store_with_project();

        let req_id = store
            .create_requirement(&project_id, RequirementDraft::new("Responsive Design", "Mobile"))
            .unwrap();

        let req = store.requirement(&project_id, &req_id).unwrap();
        assert_eq!(req.code, "REQ-001");
        assert_eq!(req.status, RequirementStatus::Pending);
        assert_eq!(req.statement, "Mobile");
        assert_eq!(req.activity_log.len(), 1);
        assert_eq!(req.activity_log[0].action, ActivityAction::Created);
        assert_eq!(req.activity_log[0].performed_by, store.actor().name);
    }

    #[test]
    fn test_requirement_codes_survive_deletion() {
        let (mut store, pid) = store_with_project();

        let first = store.create_requirement(&pid, RequirementDraft::new("A", "a")).unwrap();
        store.create_requirement(&pid, RequirementDraft::new("B", "b")).unwrap();
        assert!(store.delete_requirement(&pid, &first));
        let third = store.create_requirement(&pid, RequirementDraft::new("C", "c")).unwrap();

        assert_eq!(store.requirement(&pid, &third).unwrap().code, "REQ-003");
        let codes: Vec<_> = store
            .project(&pid)
            .unwrap()
            .requirements
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["REQ-002", "REQ-003"]);
    }

    #[test]
    fn test_codes_are_scoped_per_project() {
        let mut store = ProjectStore::default();
        let a = store.create_project(draft("A"));
        let b = store.create_project(draft("B"));

        store.create_requirement(&a, RequirementDraft::new("x", "x"));
        store.create_requirement(&a, RequirementDraft::new("y", "y"));
        let in_b = store.create_requirement(&b, RequirementDraft::new("z", "z")).unwrap();

        assert_eq!(store.requirement(&b, &in_b).unwrap().code, "REQ-001");
    }

    #[test]
    fn test_create_requirement_missing_project_is_noop() {
        let (mut store, _) = store_with_project();
        let before = store.snapshot();

        let result = store.create_requirement(&EntityId::from("nope"), RequirementDraft::new("A", "a"));

        assert!(result.is_none());
        assert!(store.snapshot().is_same(&before));
        assert_eq!(store.revision(), before.revision);
    }

    #[test]
    fn test_update_project_merges_patch() {
        let (mut store, id) = store_with_project();
        let patch = ProjectPatch {
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        };

        assert!(store.update_project(&id, &patch));

        let project = store.project(&id).unwrap();
        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.name, "Website Redesign");
        let last = project.activity_log.last().unwrap();
        assert_eq!(last.action, ActivityAction::StatusChanged);
        assert_eq!(last.changes[0].from, "active");
        assert_eq!(last.changes[0].to, "on-hold");
    }

    #[test]
    fn test_update_missing_project_is_noop() {
        let (mut store, _) = store_with_project();
        let before = store.snapshot();
        let patch = ProjectPatch {
            name: Some("Renamed".into()),
            ..Default::default()
        };

        assert!(!store.update_project(&EntityId::from("missing"), &patch));
        assert!(store.snapshot().is_same(&before));
    }

    #[test]
    fn test_update_requirement_timestamps_are_monotonic() {
        let (mut store, pid) = store_with_project();
        let rid = store.create_requirement(&pid, RequirementDraft::new("A", "a")).unwrap();
        let patch = RequirementPatch {
            title: Some("A2".into()),
            ..Default::default()
        };

        assert!(store.update_requirement(&pid, &rid, &patch));
        let req = store.requirement(&pid, &rid).unwrap();
        let first = req.updated_at.unwrap();
        assert!(first >= req.created_at);

        assert!(store.update_requirement(&pid, &rid, &RequirementPatch::default()));
        let second = store.requirement(&pid, &rid).unwrap().updated_at.unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_update_requirement_clamps_future_timestamp() {
        let (mut store, pid) = store_with_project();
        let rid = store.create_requirement(&pid, RequirementDraft::new("A", "a")).unwrap();

        // Force a previous update time ahead of the wall clock
        let future = Utc::now() + Duration::hours(1);
        let mut project = store.project(&pid).unwrap().clone();
        project.requirements[0].updated_at = Some(future);
        let mut store = ProjectStore::from_parts(vec![project], Vec::new(), Actor::default());

        assert!(store.update_requirement(&pid, &rid, &RequirementPatch::default()));
        assert_eq!(store.requirement(&pid, &rid).unwrap().updated_at, Some(future));
    }

    #[test]
    fn test_update_requirement_records_changes() {
        let (mut store, pid) = store_with_project();
        let rid = store.create_requirement(&pid, RequirementDraft::new("A", "a")).unwrap();
        let patch = RequirementPatch {
            title: Some("B".into()),
            status: Some(RequirementStatus::InProgress),
            ..Default::default()
        };

        store.update_requirement(&pid, &rid, &patch);

        let req = store.requirement(&pid, &rid).unwrap();
        assert_eq!(req.activity_log.len(), 2);
        let entry = &req.activity_log[1];
        assert_eq!(entry.action, ActivityAction::Edited);
        assert_eq!(entry.changes.len(), 2);
    }

    #[test]
    fn test_update_missing_requirement_is_noop() {
        let (mut store, pid) = store_with_project();
        let before = store.snapshot();

        assert!(!store.update_requirement(&pid, &EntityId::from("x"), &RequirementPatch::default()));
        assert!(store.snapshot().is_same(&before));
    }

    #[test]
    fn test_soft_delete_and_restore_round_trip() {
        let mut store = seed_store(Actor::default());
        let id = EntityId::from("1");
        let original = store.project(&id).unwrap().clone();

        assert!(store.soft_delete_project(&id));
        assert!(store.project(&id).is_none());
        let trashed = store.deleted_project(&id).unwrap();
        assert!(trashed.deleted_at.is_some());
        assert_eq!(trashed.requirements, original.requirements);

        assert!(store.restore_project(&id));
        assert!(store.deleted_project(&id).is_none());
        assert_eq!(store.project(&id).unwrap(), &original);
    }

    #[test]
    fn test_soft_delete_preserves_order_of_remaining() {
        let mut store = ProjectStore::default();
        let a = store.create_project(draft("A"));
        let b = store.create_project(draft("B"));
        let c = store.create_project(draft("C"));

        store.soft_delete_project(&b);
        assert_eq!(ids(store.projects()), vec![a.to_string(), c.to_string()]);

        store.restore_project(&b);
        assert_eq!(
            ids(store.projects()),
            vec![a.to_string(), c.to_string(), b.to_string()]
        );
    }

    #[test]
    fn test_project_is_in_exactly_one_collection() {
        let mut store = seed_store(Actor::default());
        let id = EntityId::from("2");

        let count = |s: &ProjectStore| {
            s.projects().iter().filter(|p| p.id == id).count()
                + s.deleted_projects().iter().filter(|p| p.id == id).count()
        };

        assert_eq!(count(&store), 1);
        store.soft_delete_project(&id);
        assert_eq!(count(&store), 1);
        store.soft_delete_project(&id);
        assert_eq!(count(&store), 1);
        store.restore_project(&id);
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn test_purge_project() {
        let mut store = seed_store(Actor::default());
        let id = EntityId::from("3");

        assert!(store.purge_project(&id));
        assert!(store.deleted_project(&id).is_none());
        assert!(store.project(&id).is_none());
    }

    #[test]
    fn test_purge_missing_project_is_noop() {
        let mut store = seed_store(Actor::default());
        let before = store.snapshot();

        // Project "1" is active, not deleted, so purge must not touch it
        assert!(!store.purge_project(&EntityId::from("1")));
        assert!(!store.purge_project(&EntityId::from("999")));

        assert!(store.snapshot().is_same(&before));
        assert!(store.project(&EntityId::from("1")).is_some());
    }

    #[test]
    fn test_restore_missing_project_is_noop() {
        let mut store = seed_store(Actor::default());
        let before = store.snapshot();
        assert!(!store.restore_project(&EntityId::from("1")));
        assert!(store.snapshot().is_same(&before));
    }

    #[test]
    fn test_snapshot_shares_untouched_projects() {
        let mut store = seed_store(Actor::default());
        let before = store.snapshot();

        store.update_project(
            &EntityId::from("1"),
            &ProjectPatch {
                name: Some("Website 2.0".into()),
                ..Default::default()
            },
        );
        let after = store.snapshot();

        assert!(!after.is_same(&before));
        assert_eq!(after.revision, before.revision + 1);
        // Touched project replaced, untouched one shared
        assert!(!Arc::ptr_eq(&before.active[0], &after.active[0]));
        assert!(Arc::ptr_eq(&before.active[1], &after.active[1]));
        assert!(Arc::ptr_eq(&before.deleted, &after.deleted));
        // Held snapshot still shows the old value
        assert_eq!(before.active[0].name, "Website Redesign");
        assert_eq!(after.active[0].name, "Website 2.0");
    }

    #[test]
    fn test_team_member_lifecycle() {
        let (mut store, pid) = store_with_project();

        let mid = store
            .add_team_member(&pid, TeamMemberDraft::invite("bob@example.com").unwrap())
            .unwrap();
        let project = store.project(&pid).unwrap();
        assert_eq!(project.team.len(), 1);
        assert_eq!(project.member(&mid).unwrap().name, "bob");
        assert_eq!(project.activity_log.len(), 2);
        assert_eq!(project.activity_log[1].action, ActivityAction::Created);

        assert!(store.update_team_member(&pid, &mid, &TeamMemberPatch::role(MemberRole::Editor)));
        let project = store.project(&pid).unwrap();
        assert_eq!(project.member(&mid).unwrap().role, MemberRole::Editor);
        assert_eq!(project.activity_log.last().unwrap().action, ActivityAction::Assigned);

        assert!(store.remove_team_member(&pid, &mid));
        assert!(store.project(&pid).unwrap().team.is_empty());
        assert!(!store.remove_team_member(&pid, &mid));
    }

    #[test]
    fn test_add_comment_to_project_and_requirement() {
        let (mut store, pid) = store_with_project();
        let rid = store.create_requirement(&pid, RequirementDraft::new("A", "a")).unwrap();

        let top = store
            .add_comment(&pid, None, CommentDraft::new("user1", "John", "Looks good"))
            .unwrap();
        let on_req = store
            .add_comment(&pid, Some(&rid), CommentDraft::new("user2", "Jane", "Agreed"))
            .unwrap();

        let project = store.project(&pid).unwrap();
        assert_eq!(project.comments.len(), 1);
        assert_eq!(project.comments[0].id, top);
        let req = project.requirement(&rid).unwrap();
        assert_eq!(req.comments.len(), 1);
        assert_eq!(req.comments[0].id, on_req);
        assert_eq!(req.activity_log.last().unwrap().action, ActivityAction::Commented);
    }

    #[test]
    fn test_add_comment_stores_parent_verbatim() {
        let (mut store, pid) = store_with_project();

        let reply = CommentDraft::new("u", "U", "reply").reply_to(EntityId::from("does-not-exist"));
        let id = store.add_comment(&pid, None, reply).unwrap();

        let comment = &store.project(&pid).unwrap().comments[0];
        assert_eq!(comment.id, id);
        assert_eq!(comment.parent_id, Some(EntityId::from("does-not-exist")));
    }

    #[test]
    fn test_add_comment_to_missing_requirement_is_noop() {
        let (mut store, pid) = store_with_project();
        let before = store.snapshot();

        let result = store.add_comment(
            &pid,
            Some(&EntityId::from("missing")),
            CommentDraft::new("u", "U", "hi"),
        );

        assert!(result.is_none());
        assert!(store.snapshot().is_same(&before));
    }

    #[test]
    fn test_delete_comment_removes_replies() {
        let (mut store, pid) = store_with_project();
        let root = store
            .add_comment(&pid, None, CommentDraft::new("u", "U", "root"))
            .unwrap();
        let child = store
            .add_comment(&pid, None, CommentDraft::new("u", "U", "child").reply_to(root.clone()))
            .unwrap();
        store
            .add_comment(&pid, None, CommentDraft::new("u", "U", "grandchild").reply_to(child))
            .unwrap();
        let other = store
            .add_comment(&pid, None, CommentDraft::new("u", "U", "other"))
            .unwrap();

        assert!(store.delete_comment(&pid, None, &root));

        let comments = &store.project(&pid).unwrap().comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, other);
        assert!(!store.delete_comment(&pid, None, &root));
    }

    #[test]
    fn test_operations_on_deleted_project_are_noops() {
        let mut store = seed_store(Actor::default());
        let id = EntityId::from("3");
        let before = store.snapshot();

        assert!(store.create_requirement(&id, RequirementDraft::new("A", "a")).is_none());
        assert!(!store.update_project(&id, &ProjectPatch::default()));
        assert!(store.add_team_member(&id, TeamMemberDraft::invite("a@b.c").unwrap()).is_none());

        assert!(store.snapshot().is_same(&before));
    }

    #[test]
    fn test_set_actor_labels_new_entries() {
        let mut store = ProjectStore::default();
        store.set_actor(Actor::new("Ada"));
        let id = store.create_project(draft("A"));
        assert_eq!(store.project(&id).unwrap().activity_log[0].performed_by, "Ada");
    }
}
