use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Prefix of the human-readable requirement code (e.g. "REQ-001")
pub const REQUIREMENT_CODE_PREFIX: &str = "REQ";

/// Name recorded on activity entries when no actor is configured
pub const DEFAULT_ACTOR_NAME: &str = "Current User";

/// Opaque identity of any stored entity
///
/// Generated identities are UUID v4 strings; seeded records use short
/// literal ids such as "1".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh, globally unique identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
    ];
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::OnHold => write!(f, "on-hold"),
            ProjectStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "on-hold" | "on_hold" | "onhold" => Ok(ProjectStatus::OnHold),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(Error::InvalidValue {
                field: "project status",
                value: s.to_string(),
            }),
        }
    }
}

/// Progress status of a requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl RequirementStatus {
    pub const ALL: [RequirementStatus; 4] = [
        RequirementStatus::Pending,
        RequirementStatus::InProgress,
        RequirementStatus::Completed,
        RequirementStatus::Rejected,
    ];
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementStatus::Pending => write!(f, "pending"),
            RequirementStatus::InProgress => write!(f, "in-progress"),
            RequirementStatus::Completed => write!(f, "completed"),
            RequirementStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RequirementStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequirementStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(RequirementStatus::InProgress),
            "completed" => Ok(RequirementStatus::Completed),
            "rejected" => Ok(RequirementStatus::Rejected),
            _ => Err(Error::InvalidValue {
                field: "requirement status",
                value: s.to_string(),
            }),
        }
    }
}

/// Priority of a requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidValue {
                field: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// Risk rating attached to a requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(Error::InvalidValue {
                field: "risk",
                value: s.to_string(),
            }),
        }
    }
}

/// Architectural level a requirement applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequirementLevel {
    System,
    Subsystem,
    Component,
}

impl RequirementLevel {
    pub const ALL: [RequirementLevel; 3] = [
        RequirementLevel::System,
        RequirementLevel::Subsystem,
        RequirementLevel::Component,
    ];
}

impl fmt::Display for RequirementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementLevel::System => write!(f, "system"),
            RequirementLevel::Subsystem => write!(f, "subsystem"),
            RequirementLevel::Component => write!(f, "component"),
        }
    }
}

impl FromStr for RequirementLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "system" => Ok(RequirementLevel::System),
            "subsystem" => Ok(RequirementLevel::Subsystem),
            "component" => Ok(RequirementLevel::Component),
            _ => Err(Error::InvalidValue {
                field: "level",
                value: s.to_string(),
            }),
        }
    }
}

/// Classification of a requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementType {
    Functional,
    NonFunctional,
    Constraint,
    Interface,
}

impl RequirementType {
    pub const ALL: [RequirementType; 4] = [
        RequirementType::Functional,
        RequirementType::NonFunctional,
        RequirementType::Constraint,
        RequirementType::Interface,
    ];
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementType::Functional => write!(f, "functional"),
            RequirementType::NonFunctional => write!(f, "non-functional"),
            RequirementType::Constraint => write!(f, "constraint"),
            RequirementType::Interface => write!(f, "interface"),
        }
    }
}

impl FromStr for RequirementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "functional" => Ok(RequirementType::Functional),
            "non-functional" | "nonfunctional" | "non_functional" => {
                Ok(RequirementType::NonFunctional)
            }
            "constraint" => Ok(RequirementType::Constraint),
            "interface" => Ok(RequirementType::Interface),
            _ => Err(Error::InvalidValue {
                field: "requirement type",
                value: s.to_string(),
            }),
        }
    }
}

/// Role of a team member within a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl MemberRole {
    pub const ALL: [MemberRole; 4] = [
        MemberRole::Owner,
        MemberRole::Admin,
        MemberRole::Editor,
        MemberRole::Viewer,
    ];
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRole::Owner => write!(f, "owner"),
            MemberRole::Admin => write!(f, "admin"),
            MemberRole::Editor => write!(f, "editor"),
            MemberRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for MemberRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(MemberRole::Owner),
            "admin" => Ok(MemberRole::Admin),
            "editor" => Ok(MemberRole::Editor),
            "viewer" => Ok(MemberRole::Viewer),
            _ => Err(Error::InvalidValue {
                field: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Kind of mutation an activity entry records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Edited,
    Deleted,
    StatusChanged,
    Assigned,
    Commented,
}

impl ActivityAction {
    pub const ALL: [ActivityAction; 6] = [
        ActivityAction::Created,
        ActivityAction::Edited,
        ActivityAction::Deleted,
        ActivityAction::StatusChanged,
        ActivityAction::Assigned,
        ActivityAction::Commented,
    ];
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityAction::Created => write!(f, "created"),
            ActivityAction::Edited => write!(f, "edited"),
            ActivityAction::Deleted => write!(f, "deleted"),
            ActivityAction::StatusChanged => write!(f, "status_changed"),
            ActivityAction::Assigned => write!(f, "assigned"),
            ActivityAction::Commented => write!(f, "commented"),
        }
    }
}

impl FromStr for ActivityAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "created" => Ok(ActivityAction::Created),
            "edited" => Ok(ActivityAction::Edited),
            "deleted" => Ok(ActivityAction::Deleted),
            "status_changed" | "statuschanged" => Ok(ActivityAction::StatusChanged),
            "assigned" => Ok(ActivityAction::Assigned),
            "commented" => Ok(ActivityAction::Commented),
            _ => Err(Error::InvalidValue {
                field: "action",
                value: s.to_string(),
            }),
        }
    }
}

/// Who performs store mutations; used to label synthesized activity entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(DEFAULT_ACTOR_NAME)
    }
}

/// One field-level change recorded on an activity entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub from: String,
    pub to: String,
}

/// An audit record describing one mutation to a project or requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: EntityId,
    pub action: ActivityAction,
    pub performed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_by_avatar: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

impl ActivityLog {
    /// Creates an entry performed by `actor` right now
    pub fn new(action: ActivityAction, actor: &Actor, details: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(),
            action,
            performed_by: actor.name.clone(),
            performed_by_avatar: actor.avatar.clone(),
            timestamp: Utc::now(),
            details: Some(details.into()),
            changes: Vec::new(),
        }
    }

    pub fn with_changes(mut self, changes: Vec<FieldChange>) -> Self {
        self.changes = changes;
        self
    }
}

/// A comment on a project or requirement
///
/// Replies are stored alongside their parent in the same flat sequence and
/// point back to it through `parent_id`; see [`crate::comments`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub author_id: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A member of a project team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: EntityId,
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Represents a single requirement within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: EntityId,

    /// Project-scoped human-readable code (e.g. "REQ-001")
    pub code: String,

    pub title: String,

    /// Formal "shall" statement
    pub statement: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<RequirementLevel>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub req_type: Option<RequirementType>,

    pub status: RequirementStatus,

    pub priority: Priority,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub activity_log: Vec<ActivityLog>,
}

impl Requirement {
    /// True when `key` is this requirement's identity or (case-insensitively) its code
    pub fn matches_key(&self, key: &str) -> bool {
        self.id.as_str() == key || self.code.eq_ignore_ascii_case(key)
    }
}

/// A project and everything it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub activity_log: Vec<ActivityLog>,
    /// Number that the next requirement code will carry
    #[serde(default = "default_next_requirement_number")]
    pub next_requirement_number: u32,
}

/// Default value for next_requirement_number
fn default_next_requirement_number() -> u32 {
    1
}

impl Project {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn requirement(&self, id: &EntityId) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == *id)
    }

    /// Looks a requirement up by identity or by code
    pub fn find_requirement(&self, key: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.matches_key(key))
    }

    pub fn member(&self, id: &EntityId) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.id == *id)
    }

    /// Gets the requirement code that would be assigned next
    pub fn peek_next_requirement_code(&self) -> String {
        format_requirement_code(self.next_requirement_number)
    }

    /// Gets the next requirement code and advances the counter
    pub(crate) fn take_requirement_code(&mut self) -> String {
        let code = self.peek_next_requirement_code();
        self.next_requirement_number += 1;
        code
    }
}

/// Formats a requirement number as a zero-padded code
pub fn format_requirement_code(number: u32) -> String {
    format!("{}-{:03}", REQUIREMENT_CODE_PREFIX, number)
}

/// Parses a YYYY-MM-DD calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

// =========================================================================
// Drafts: caller-validated input for create operations
// =========================================================================

/// Input for creating a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: ProjectStatus::Active,
            start_date,
        }
    }
}

/// Input for creating a requirement; the code is assigned by the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementDraft {
    pub title: String,
    /// Left empty, the description is used as the statement
    pub statement: String,
    pub description: String,
    pub rationale: Option<String>,
    pub risk: Option<RiskLevel>,
    pub level: Option<RequirementLevel>,
    pub req_type: Option<RequirementType>,
    pub status: RequirementStatus,
    pub priority: Priority,
}

impl RequirementDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Input for adding a team member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMemberDraft {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: MemberRole,
}

impl TeamMemberDraft {
    /// Builds a viewer invitation for an email address
    ///
    /// The display name is the part of the address before the '@'.
    pub fn invite(email: &str) -> Result<Self> {
        let email = email.trim();
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| Error::InvalidEmail(email.to_string()))?;
        if local.is_empty() || domain.is_empty() {
            return Err(Error::InvalidEmail(email.to_string()));
        }

        Ok(Self {
            user_id: Uuid::new_v4().to_string(),
            name: local.to_string(),
            email: email.to_string(),
            avatar: None,
            role: MemberRole::Viewer,
        })
    }
}

/// Input for adding a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub content: String,
    pub parent_id: Option<EntityId>,
}

impl CommentDraft {
    pub fn new(
        author_id: impl Into<String>,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            author_name: author_name.into(),
            author_avatar: None,
            content: content.into(),
            parent_id: None,
        }
    }

    /// Marks this draft as a reply to `parent`
    pub fn reply_to(mut self, parent: EntityId) -> Self {
        self.parent_id = Some(parent);
        self
    }
}

// =========================================================================
// Patches: partial updates, each applied field reported as a FieldChange
// =========================================================================

fn apply_value<T>(changes: &mut Vec<FieldChange>, field: &str, slot: &mut T, value: &Option<T>)
where
    T: PartialEq + Clone + fmt::Display,
{
    if let Some(value) = value {
        if slot != value {
            changes.push(FieldChange {
                field: field.to_string(),
                from: slot.to_string(),
                to: value.to_string(),
            });
            *slot = value.clone();
        }
    }
}

fn apply_optional<T>(
    changes: &mut Vec<FieldChange>,
    field: &str,
    slot: &mut Option<T>,
    value: &Option<T>,
) where
    T: PartialEq + Clone + fmt::Display,
{
    if let Some(value) = value {
        if slot.as_ref() != Some(value) {
            changes.push(FieldChange {
                field: field.to_string(),
                from: slot.as_ref().map(|v| v.to_string()).unwrap_or_default(),
                to: value.to_string(),
            });
            *slot = Some(value.clone());
        }
    }
}

/// Like `apply_optional`, but `Some(None)` clears the slot
fn apply_clearable<T>(
    changes: &mut Vec<FieldChange>,
    field: &str,
    slot: &mut Option<T>,
    value: &Option<Option<T>>,
) where
    T: PartialEq + Clone + fmt::Display,
{
    if let Some(value) = value {
        if slot != value {
            changes.push(FieldChange {
                field: field.to_string(),
                from: slot.as_ref().map(|v| v.to_string()).unwrap_or_default(),
                to: value.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            });
            *slot = value.clone();
        }
    }
}

/// Partial update of a project's own fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into `project`, returning the fields that changed
    pub fn apply(&self, project: &mut Project) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        apply_value(&mut changes, "name", &mut project.name, &self.name);
        apply_value(&mut changes, "description", &mut project.description, &self.description);
        apply_value(&mut changes, "status", &mut project.status, &self.status);
        apply_value(&mut changes, "start_date", &mut project.start_date, &self.start_date);
        changes
    }
}

/// Partial update of a requirement; the code is not patchable
///
/// The optional attributes take `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementPatch {
    pub title: Option<String>,
    pub statement: Option<String>,
    pub description: Option<String>,
    pub rationale: Option<Option<String>>,
    pub risk: Option<Option<RiskLevel>>,
    pub level: Option<Option<RequirementLevel>>,
    pub req_type: Option<Option<RequirementType>>,
    pub status: Option<RequirementStatus>,
    pub priority: Option<Priority>,
}

impl RequirementPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into `req`, returning the fields that changed
    pub fn apply(&self, req: &mut Requirement) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        apply_value(&mut changes, "title", &mut req.title, &self.title);
        apply_value(&mut changes, "statement", &mut req.statement, &self.statement);
        apply_value(&mut changes, "description", &mut req.description, &self.description);
        apply_clearable(&mut changes, "rationale", &mut req.rationale, &self.rationale);
        apply_clearable(&mut changes, "risk", &mut req.risk, &self.risk);
        apply_clearable(&mut changes, "level", &mut req.level, &self.level);
        apply_clearable(&mut changes, "type", &mut req.req_type, &self.req_type);
        apply_value(&mut changes, "status", &mut req.status, &self.status);
        apply_value(&mut changes, "priority", &mut req.priority, &self.priority);
        changes
    }
}

/// Partial update of a team member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<MemberRole>,
}

impl TeamMemberPatch {
    pub fn role(role: MemberRole) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    /// Merges the patch into `member`, returning the fields that changed
    pub fn apply(&self, member: &mut TeamMember) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        apply_value(&mut changes, "name", &mut member.name, &self.name);
        apply_value(&mut changes, "email", &mut member.email, &self.email);
        apply_optional(&mut changes, "avatar", &mut member.avatar, &self.avatar);
        apply_value(&mut changes, "role", &mut member.role, &self.role);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_requirement() -> Requirement {
        Requirement {
            id: EntityId::from("1"),
            code: "REQ-001".into(),
            title: "Responsive Design".into(),
            statement: "The website shall be responsive.".into(),
            description: "Mobile friendly".into(),
            rationale: None,
            risk: Some(RiskLevel::Medium),
            level: None,
            req_type: None,
            status: RequirementStatus::Pending,
            priority: Priority::High,
            created_at: Utc::now(),
            updated_at: None,
            comments: Vec::new(),
            activity_log: Vec::new(),
        }
    }

    #[test]
    fn test_format_requirement_code() {
        assert_eq!(format_requirement_code(1), "REQ-001");
        assert_eq!(format_requirement_code(42), "REQ-042");
        assert_eq!(format_requirement_code(1234), "REQ-1234");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("on-hold".parse::<ProjectStatus>(), Ok(ProjectStatus::OnHold));
        assert_eq!("OnHold".parse::<ProjectStatus>(), Ok(ProjectStatus::OnHold));
        assert_eq!(
            "in_progress".parse::<RequirementStatus>(),
            Ok(RequirementStatus::InProgress)
        );
        assert_eq!(
            "nonfunctional".parse::<RequirementType>(),
            Ok(RequirementType::NonFunctional)
        );

        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.to_string(), "invalid priority: 'urgent'");
    }

    #[test]
    fn test_display_matches_serde_spelling() {
        for status in RequirementStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        for status in ProjectStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        let json = serde_json::to_string(&ActivityAction::StatusChanged).unwrap();
        assert_eq!(json, "\"status_changed\"");
    }

    #[test]
    fn test_activity_action_from_str() {
        for action in ActivityAction::ALL {
            assert_eq!(action.to_string().parse::<ActivityAction>(), Ok(action));
        }
        assert_eq!(
            "Status-Changed".parse::<ActivityAction>(),
            Ok(ActivityAction::StatusChanged)
        );
        assert!("renamed".parse::<ActivityAction>().is_err());
    }

    #[test]
    fn test_requirement_defaults() {
        let draft = RequirementDraft::new("Title", "Desc");
        assert_eq!(draft.status, RequirementStatus::Pending);
        assert_eq!(draft.priority, Priority::Medium);
        assert!(draft.statement.is_empty());
    }

    #[test]
    fn test_requirement_patch_reports_changes() {
        let mut req = sample_requirement();
        let patch = RequirementPatch {
            title: Some("Responsive Design".into()),
            status: Some(RequirementStatus::Completed),
            rationale: Some(Some("Accessibility".into())),
            ..Default::default()
        };

        let changes = patch.apply(&mut req);

        assert_eq!(req.status, RequirementStatus::Completed);
        assert_eq!(req.rationale.as_deref(), Some("Accessibility"));
        // Title was unchanged so it is not reported
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "rationale");
        assert_eq!(changes[0].from, "");
        assert_eq!(changes[1].field, "status");
        assert_eq!(changes[1].from, "pending");
        assert_eq!(changes[1].to, "completed");
    }

    #[test]
    fn test_requirement_patch_clears_optional_fields() {
        let mut req = sample_requirement();
        let patch = RequirementPatch {
            risk: Some(None),
            level: Some(None),
            ..Default::default()
        };

        let changes = patch.apply(&mut req);

        assert_eq!(req.risk, None);
        // Level was already unset
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "risk");
        assert_eq!(changes[0].from, "medium");
        assert_eq!(changes[0].to, "");
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut req = sample_requirement();
        let before = req.clone();
        assert!(RequirementPatch::default().is_empty());
        assert!(RequirementPatch::default().apply(&mut req).is_empty());
        assert_eq!(req, before);
    }

    #[test]
    fn test_invite_uses_local_part() {
        let draft = TeamMemberDraft::invite("alice@example.com").unwrap();
        assert_eq!(draft.name, "alice");
        assert_eq!(draft.role, MemberRole::Viewer);
        assert!(!draft.user_id.is_empty());

        assert_eq!(
            TeamMemberDraft::invite("not-an-email"),
            Err(Error::InvalidEmail("not-an-email".into()))
        );
        assert!(TeamMemberDraft::invite("@example.com").is_err());
    }

    #[test]
    fn test_matches_key() {
        let req = sample_requirement();
        assert!(req.matches_key("1"));
        assert!(req.matches_key("req-001"));
        assert!(!req.matches_key("REQ-002"));
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date.to_string(), "2024-01-15");
        assert_eq!(parse_date("15/01/2024"), Err(Error::InvalidDate("15/01/2024".into())));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }
}
