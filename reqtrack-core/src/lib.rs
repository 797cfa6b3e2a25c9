pub mod comments;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod notify;
pub mod routes;
pub mod seed;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use comments::CommentThread;
pub use config::{get_config_path, Config};
pub use error::Error;
pub use export::ExportFormat;
pub use filter::{RequirementCounts, RequirementFilter};
pub use models::{
    parse_date, ActivityAction, ActivityLog, Actor, Comment, CommentDraft, EntityId, FieldChange,
    MemberRole, Priority, Project, ProjectDraft, ProjectPatch, ProjectStatus, Requirement,
    RequirementDraft, RequirementLevel, RequirementPatch, RequirementStatus, RequirementType,
    RiskLevel, TeamMember, TeamMemberDraft, TeamMemberPatch,
};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use routes::Route;
pub use seed::seed_store;
pub use session::{Session, User};
pub use store::{ProjectStore, Snapshot};
