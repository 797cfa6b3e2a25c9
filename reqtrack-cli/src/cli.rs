use clap::{Parser, Subcommand};
use std::path::PathBuf;

use reqtrack_core::{EntityId, Route};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Track projects, requirements, teams and discussion")]
pub struct Cli {
    /// Path to the config file (defaults to REQTRACK_CONFIG or ~/.reqtrack.yaml)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Start with an empty store instead of the sample projects
    #[clap(long)]
    pub empty: bool,

    /// Sign in with this email before running
    #[clap(long, short = 'u')]
    pub user: Option<String>,

    /// Run a single command and exit; without one an interactive shell starts
    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// One line typed at the shell prompt
#[derive(Parser, Debug)]
#[clap(name = "reqtrack", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Show a project with its requirements, team, comments and activity
    Show {
        /// Project ID
        id: String,
    },

    /// Create a new project
    New {
        #[clap(long)]
        name: Option<String>,

        #[clap(long)]
        description: Option<String>,

        /// Status (active, on-hold, completed)
        #[clap(long)]
        status: Option<String>,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[clap(long)]
        start_date: Option<String>,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Edit an existing project
    Edit {
        /// Project ID
        id: String,

        #[clap(long)]
        name: Option<String>,

        #[clap(long)]
        description: Option<String>,

        /// Status (active, on-hold, completed)
        #[clap(long)]
        status: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[clap(long)]
        start_date: Option<String>,
    },

    /// Move a project to the trash
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Bring a project back from the trash
    Restore { id: String },

    /// Permanently remove a project from the trash
    Purge {
        id: String,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RequirementCommand {
    /// List a project's requirements
    List {
        /// Project ID
        project: String,

        /// Search title, description and code
        #[clap(long, short = 's')]
        search: Option<String>,

        /// Filter by type (functional, non-functional, constraint, interface)
        #[clap(long)]
        r#type: Option<String>,

        /// Filter by priority (low, medium, high)
        #[clap(long)]
        priority: Option<String>,

        /// Filter by level (system, subsystem, component)
        #[clap(long)]
        level: Option<String>,

        /// Filter by status (pending, in-progress, completed, rejected)
        #[clap(long)]
        status: Option<String>,
    },

    /// Show details for a specific requirement
    Show {
        /// Project ID
        project: String,

        /// Requirement ID or code (e.g. REQ-001)
        id: String,
    },

    /// Add a new requirement
    Add {
        /// Project ID
        project: String,

        #[clap(flatten)]
        fields: RequirementFields,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Edit an existing requirement
    Edit {
        /// Project ID
        project: String,

        /// Requirement ID or code
        id: String,

        #[clap(flatten)]
        fields: RequirementFields,
    },

    /// Delete a requirement
    Del {
        /// Project ID
        project: String,

        /// Requirement ID or code
        id: String,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct RequirementFields {
    #[clap(long)]
    pub title: Option<String>,

    #[clap(long)]
    pub description: Option<String>,

    /// Formal "shall" statement (defaults to the description)
    #[clap(long)]
    pub statement: Option<String>,

    /// Rationale; an empty value clears it on edit
    #[clap(long)]
    pub rationale: Option<String>,

    /// Risk (low, medium, high, critical; "none" clears it on edit)
    #[clap(long)]
    pub risk: Option<String>,

    /// Level (system, subsystem, component; "none" clears it on edit)
    #[clap(long)]
    pub level: Option<String>,

    /// Type (functional, non-functional, constraint, interface; "none" clears it on edit)
    #[clap(long)]
    pub r#type: Option<String>,

    /// Status (pending, in-progress, completed, rejected)
    #[clap(long)]
    pub status: Option<String>,

    /// Priority (low, medium, high)
    #[clap(long)]
    pub priority: Option<String>,
}

impl RequirementFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.statement.is_none()
            && self.rationale.is_none()
            && self.risk.is_none()
            && self.level.is_none()
            && self.r#type.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// List a project's team
    List { project: String },

    /// Invite someone by email (joins as viewer)
    Invite { project: String, email: String },

    /// Change a member's role (owner, admin, editor, viewer)
    Role {
        project: String,
        member: String,
        role: String,
    },

    /// Remove a member from the team
    Remove {
        project: String,
        member: String,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommand {
    /// List comments as threads
    List {
        project: String,

        /// Requirement ID or code; omit for project-level comments
        #[clap(long)]
        req: Option<String>,
    },

    /// Add a comment or reply
    Add {
        project: String,

        /// Comment text; prompted for when omitted
        content: Option<String>,

        /// Requirement ID or code; omit for a project-level comment
        #[clap(long)]
        req: Option<String>,

        /// ID of the comment being replied to
        #[clap(long)]
        parent: Option<String>,
    },

    /// Delete a comment and its replies
    Del {
        project: String,
        comment: String,

        #[clap(long)]
        req: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with an email address
    SignIn { email: String },

    /// Sign out of the current session
    SignOut,

    /// Show who is signed in
    Whoami,

    /// Open a view by path (/, /project/new, /project/:id, /deleted, ...)
    Open { path: String },

    /// List active projects
    Projects,

    /// List deleted projects
    Deleted,

    /// Project management commands
    #[clap(subcommand)]
    Project(ProjectCommand),

    /// Requirement management commands
    #[clap(subcommand)]
    Req(RequirementCommand),

    /// Team management commands
    #[clap(subcommand)]
    Team(TeamCommand),

    /// Comment commands
    #[clap(subcommand)]
    Comment(CommentCommand),

    /// Show the activity log of a project or one of its requirements
    Activity {
        project: String,

        /// Requirement ID or code
        #[clap(long)]
        req: Option<String>,
    },

    /// Show or change settings
    Settings {
        /// Name recorded on new activity entries
        #[clap(long)]
        actor_name: Option<String>,

        /// Avatar URL recorded on new activity entries
        #[clap(long)]
        actor_avatar: Option<String>,

        /// Write the settings to the config file
        #[clap(long)]
        save: bool,
    },

    /// Export the current state
    Export {
        /// Output format (json, yaml, markdown)
        #[clap(long, short = 'f', default_value = "markdown")]
        format: String,

        /// Output file path; prints to stdout when omitted
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Leave the shell
    #[clap(alias = "exit")]
    Quit,
}

impl Command {
    /// The view a command belongs to, used for session gating
    ///
    /// `None` for commands that work without a session.
    pub fn route(&self) -> Option<Route> {
        let route = match self {
            Command::SignIn { .. } => Route::Auth,
            Command::SignOut | Command::Whoami | Command::Quit => return None,
            Command::Open { path } => Route::parse(path),
            Command::Projects | Command::Export { .. } => Route::Projects,
            Command::Deleted => Route::Deleted,
            Command::Settings { .. } => Route::Settings,
            Command::Project(cmd) => match cmd {
                ProjectCommand::New { .. } => Route::NewProject,
                ProjectCommand::Edit { id, .. } => Route::EditProject(EntityId::from(id.as_str())),
                ProjectCommand::Restore { .. } | ProjectCommand::Purge { .. } => Route::Deleted,
                ProjectCommand::Show { id } | ProjectCommand::Delete { id, .. } => {
                    Route::ProjectDetail(EntityId::from(id.as_str()))
                }
            },
            Command::Req(cmd) => match cmd {
                RequirementCommand::Show { project, id }
                | RequirementCommand::Edit { project, id, .. } => Route::RequirementDetail {
                    project_id: EntityId::from(project.as_str()),
                    requirement_id: EntityId::from(id.as_str()),
                },
                RequirementCommand::List { project, .. }
                | RequirementCommand::Add { project, .. }
                | RequirementCommand::Del { project, .. } => {
                    Route::ProjectDetail(EntityId::from(project.as_str()))
                }
            },
            Command::Team(cmd) => match cmd {
                TeamCommand::List { project }
                | TeamCommand::Invite { project, .. }
                | TeamCommand::Role { project, .. }
                | TeamCommand::Remove { project, .. } => {
                    Route::ProjectDetail(EntityId::from(project.as_str()))
                }
            },
            Command::Comment(cmd) => match cmd {
                CommentCommand::List { project, .. }
                | CommentCommand::Add { project, .. }
                | CommentCommand::Del { project, .. } => {
                    Route::ProjectDetail(EntityId::from(project.as_str()))
                }
            },
            Command::Activity { project, .. } => {
                Route::ProjectDetail(EntityId::from(project.as_str()))
            }
        };
        Some(route)
    }
}
