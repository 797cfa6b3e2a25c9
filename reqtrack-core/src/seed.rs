//! Fixed start-up data
//!
//! Seeded records carry short literal ids ("1", "2", ...) rather than
//! generated ones; ids only need to be unique within their own collection.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::{
    ActivityAction, ActivityLog, Actor, Comment, EntityId, FieldChange, MemberRole, Priority,
    Project, ProjectStatus, Requirement, RequirementLevel, RequirementStatus, RequirementType,
    RiskLevel, TeamMember,
};
use crate::store::ProjectStore;

const JOHN_AVATAR: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=John";
const JANE_AVATAR: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=Jane";
const BOB_AVATAR: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=Bob";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_time(NaiveTime::MIN).and_utc()
}

fn activity_log() -> Vec<ActivityLog> {
    vec![
        ActivityLog {
            id: EntityId::from("1"),
            action: ActivityAction::Created,
            performed_by: "John Doe".into(),
            performed_by_avatar: Some(JOHN_AVATAR.into()),
            timestamp: at(2024, 1, 10),
            details: Some("Created requirement".into()),
            changes: Vec::new(),
        },
        ActivityLog {
            id: EntityId::from("2"),
            action: ActivityAction::Edited,
            performed_by: "Jane Smith".into(),
            performed_by_avatar: Some(JANE_AVATAR.into()),
            timestamp: at(2024, 1, 15),
            details: Some("Updated description".into()),
            changes: vec![FieldChange {
                field: "description".into(),
                from: "Old description".into(),
                to: "New description".into(),
            }],
        },
    ]
}

fn comments() -> Vec<Comment> {
    vec![
        Comment {
            id: EntityId::from("1"),
            author_id: "user1".into(),
            author_name: "John Doe".into(),
            author_avatar: Some(JOHN_AVATAR.into()),
            content: "This looks good! Let me know when its ready for review.".into(),
            created_at: at(2024, 1, 12),
            parent_id: None,
        },
        Comment {
            id: EntityId::from("2"),
            author_id: "user2".into(),
            author_name: "Jane Smith".into(),
            author_avatar: Some(JANE_AVATAR.into()),
            content: "Will do! Just finishing up the last changes.".into(),
            created_at: at(2024, 1, 12),
            parent_id: Some(EntityId::from("1")),
        },
    ]
}

fn team() -> Vec<TeamMember> {
    vec![
        TeamMember {
            id: EntityId::from("1"),
            user_id: "user1".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            avatar: Some(JOHN_AVATAR.into()),
            role: MemberRole::Owner,
            joined_at: at(2024, 1, 10),
        },
        TeamMember {
            id: EntityId::from("2"),
            user_id: "user2".into(),
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            avatar: Some(JANE_AVATAR.into()),
            role: MemberRole::Admin,
            joined_at: at(2024, 1, 11),
        },
        TeamMember {
            id: EntityId::from("3"),
            user_id: "user3".into(),
            name: "Bob Wilson".into(),
            email: "bob@example.com".into(),
            avatar: Some(BOB_AVATAR.into()),
            role: MemberRole::Editor,
            joined_at: at(2024, 1, 12),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn requirement(
    id: &str,
    code: &str,
    title: &str,
    statement: &str,
    description: &str,
    rationale: &str,
    risk: RiskLevel,
    level: RequirementLevel,
    req_type: RequirementType,
    status: RequirementStatus,
    created_at: DateTime<Utc>,
) -> Requirement {
    Requirement {
        id: EntityId::from(id),
        code: code.into(),
        title: title.into(),
        statement: statement.into(),
        description: description.into(),
        rationale: Some(rationale.into()),
        risk: Some(risk),
        level: Some(level),
        req_type: Some(req_type),
        status,
        priority: Priority::High,
        created_at,
        updated_at: None,
        comments: Vec::new(),
        activity_log: Vec::new(),
    }
}

fn website_redesign() -> Project {
    let mut responsive = requirement(
        "1",
        "REQ-001",
        "Responsive Design",
        "The website shall be fully responsive across all device sizes.",
        "Website must be mobile-friendly and adapt to different screen sizes.",
        "To ensure accessibility for all users regardless of device.",
        RiskLevel::Medium,
        RequirementLevel::System,
        RequirementType::NonFunctional,
        RequirementStatus::Completed,
        at(2024, 1, 11),
    );
    responsive.updated_at = Some(at(2024, 1, 20));
    responsive.comments = comments();
    responsive.activity_log = activity_log();

    let mut seo = requirement(
        "2",
        "REQ-002",
        "SEO Optimization",
        "The website shall implement SEO best practices.",
        "Implement meta tags, structured data, and performance optimizations.",
        "To improve search engine rankings and organic traffic.",
        RiskLevel::Low,
        RequirementLevel::System,
        RequirementType::NonFunctional,
        RequirementStatus::InProgress,
        at(2024, 1, 12),
    );
    seo.activity_log = activity_log();

    let auth = requirement(
        "3",
        "REQ-003",
        "User Authentication",
        "The system shall provide secure user authentication.",
        "Implement login, registration, and password recovery functionality.",
        "To protect user data and provide personalized experiences.",
        RiskLevel::High,
        RequirementLevel::Subsystem,
        RequirementType::Functional,
        RequirementStatus::Pending,
        at(2024, 1, 13),
    );

    Project {
        id: EntityId::from("1"),
        name: "Website Redesign".into(),
        description: "Complete overhaul of company website".into(),
        status: ProjectStatus::Active,
        start_date: date(2024, 1, 15),
        created_at: at(2024, 1, 10),
        deleted_at: None,
        requirements: vec![responsive, seo, auth],
        team: team(),
        comments: comments(),
        activity_log: activity_log(),
        next_requirement_number: 4,
    }
}

fn mobile_app() -> Project {
    let auth = requirement(
        "1",
        "REQ-001",
        "User Authentication",
        "The mobile app shall support user authentication.",
        "Secure login system with biometric support.",
        "To ensure secure access to user data.",
        RiskLevel::High,
        RequirementLevel::System,
        RequirementType::Functional,
        RequirementStatus::Pending,
        at(2024, 1, 26),
    );

    Project {
        id: EntityId::from("2"),
        name: "Mobile App Development".into(),
        description: "Native mobile application for iOS and Android".into(),
        status: ProjectStatus::Active,
        start_date: date(2024, 2, 1),
        created_at: at(2024, 1, 25),
        deleted_at: None,
        requirements: vec![auth],
        team: team().into_iter().take(2).collect(),
        comments: Vec::new(),
        activity_log: activity_log(),
        next_requirement_number: 2,
    }
}

fn legacy_migration() -> Project {
    Project {
        id: EntityId::from("3"),
        name: "Legacy System Migration".into(),
        description: "Migration of legacy systems to cloud infrastructure".into(),
        status: ProjectStatus::OnHold,
        start_date: date(2023, 6, 1),
        created_at: at(2023, 5, 15),
        deleted_at: Some(at(2024, 1, 1)),
        requirements: Vec::new(),
        team: Vec::new(),
        comments: Vec::new(),
        activity_log: Vec::new(),
        next_requirement_number: 1,
    }
}

/// Builds the store every session starts from
pub fn seed_store(actor: Actor) -> ProjectStore {
    ProjectStore::from_parts(
        vec![website_redesign(), mobile_app()],
        vec![legacy_migration()],
        actor,
    )
}
