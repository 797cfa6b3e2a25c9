use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use std::path::PathBuf;
use std::str::FromStr;

use reqtrack_core::export::{export_to_file, render};
use reqtrack_core::{
    parse_date, CommentDraft, Config, EntityId, ExportFormat, MemberRole, Notice, NoticeLevel,
    Notifier, Project, ProjectDraft, ProjectPatch, ProjectStore, RequirementDraft,
    RequirementFilter, RequirementPatch, Route, Session, TeamMemberDraft, TeamMemberPatch,
};

use crate::cli::{
    Command, CommentCommand, ProjectCommand, RequirementCommand, RequirementFields, TeamCommand,
};
use crate::{prompts, views};

/// What the shell should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Prints notices to the terminal
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message.green()),
            NoticeLevel::Error => eprintln!("{}", notice.message.red()),
            NoticeLevel::Info => println!("{}", notice.message.yellow()),
        }
    }
}

/// Parses an optional command-line value into one of the model enums
fn parse_opt<T>(value: Option<&String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.map(|v| v.parse::<T>()).transpose().map_err(Into::into)
}

/// Trims a required flag value, rejecting a missing or blank one
fn required_flag(value: Option<&str>, flag: &str) -> Result<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        anyhow::bail!("--{} is required and cannot be blank (or use --interactive)", flag);
    }
    Ok(value.to_string())
}

/// Trims a new value for a required field; blank values are rejected
fn non_blank(value: Option<String>, flag: &str) -> Result<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => anyhow::bail!("--{} cannot be blank", flag),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a value for an optional attribute; blank or "none" clears it
fn clearable<T>(value: Option<&String>) -> Result<Option<Option<T>>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value.map(|v| v.trim()) {
        None => Ok(None),
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case("none") => Ok(Some(None)),
        Some(v) => Ok(Some(Some(v.parse::<T>()?))),
    }
}

fn requirement_draft(fields: &RequirementFields) -> Result<RequirementDraft> {
    let title = required_flag(fields.title.as_deref(), "title")?;
    let description = required_flag(fields.description.as_deref(), "description")?;

    let mut draft = RequirementDraft::new(title, description);
    draft.statement = fields
        .statement
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    draft.rationale = fields
        .rationale
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from);
    draft.risk = parse_opt(fields.risk.as_ref())?;
    draft.level = parse_opt(fields.level.as_ref())?;
    draft.req_type = parse_opt(fields.r#type.as_ref())?;
    if let Some(status) = parse_opt(fields.status.as_ref())? {
        draft.status = status;
    }
    if let Some(priority) = parse_opt(fields.priority.as_ref())? {
        draft.priority = priority;
    }
    Ok(draft)
}

fn requirement_patch(fields: &RequirementFields) -> Result<RequirementPatch> {
    Ok(RequirementPatch {
        title: non_blank(fields.title.clone(), "title")?,
        statement: non_blank(fields.statement.clone(), "statement")?,
        description: non_blank(fields.description.clone(), "description")?,
        rationale: fields.rationale.as_deref().map(|r| {
            let r = r.trim();
            (!r.is_empty()).then(|| r.to_string())
        }),
        risk: clearable(fields.risk.as_ref())?,
        level: clearable(fields.level.as_ref())?,
        req_type: clearable(fields.r#type.as_ref())?,
        status: parse_opt(fields.status.as_ref())?,
        priority: parse_opt(fields.priority.as_ref())?,
    })
}

/// Shell state: the store, who is signed in, and the settings in effect
pub struct App {
    store: ProjectStore,
    session: Session,
    config: Config,
    config_path: PathBuf,
    notifier: Box<dyn Notifier>,
}

impl App {
    pub fn new(
        store: ProjectStore,
        session: Session,
        config: Config,
        config_path: PathBuf,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            session,
            config,
            config_path,
            notifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sign_in(&mut self, email: &str) -> Result<()> {
        let user = self.session.sign_in(email)?;
        let message = format!("Signed in as {}", user.email);
        self.notifier.notify(Notice::success(message));
        Ok(())
    }

    /// Runs one command after checking the session may open its view
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        if let Some(route) = command.route() {
            self.session.authorize(&route)?;
        }

        match command {
            Command::SignIn { email } => self.sign_in(&email)?,
            Command::SignOut => match self.session.sign_out() {
                Some(user) => self
                    .notifier
                    .notify(Notice::success(format!("Signed out {}", user.email))),
                None => self.notifier.notify(Notice::info("Nobody is signed in")),
            },
            Command::Whoami => match self.session.current_user() {
                Some(user) => println!("{}", user.email),
                None => println!("{}", "Not signed in".yellow()),
            },
            Command::Open { path } => self.open(Route::parse(&path))?,
            Command::Projects => views::print_project_list(self.store.projects()),
            Command::Deleted => views::print_deleted_list(self.store.deleted_projects()),
            Command::Project(cmd) => self.handle_project_command(cmd)?,
            Command::Req(cmd) => self.handle_requirement_command(cmd)?,
            Command::Team(cmd) => self.handle_team_command(cmd)?,
            Command::Comment(cmd) => self.handle_comment_command(cmd)?,
            Command::Activity { project, req } => self.show_activity(&project, req.as_deref()),
            Command::Settings {
                actor_name,
                actor_avatar,
                save,
            } => self.handle_settings(actor_name, actor_avatar, save)?,
            Command::Export { format, output } => {
                let format: ExportFormat = format.parse()?;
                let snapshot = self.store.snapshot();
                match output {
                    Some(path) => {
                        export_to_file(&snapshot, format, &path)?;
                        self.notifier
                            .notify(Notice::success(format!("Exported to {}", path.display())));
                    }
                    None => println!("{}", render(&snapshot, format)?),
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Renders the view behind a path
    fn open(&mut self, route: Route) -> Result<()> {
        match route {
            Route::Auth => match self.session.current_user() {
                Some(user) => println!("Signed in as {}", user.email.cyan()),
                None => println!("Sign in with {}", "sign-in <email>".cyan()),
            },
            Route::Projects => views::print_project_list(self.store.projects()),
            Route::NewProject => self.create_project_interactive()?,
            Route::ProjectDetail(id) => match self.store.project(&id) {
                Some(project) => views::print_project_detail(project),
                None => self.project_not_found(&id),
            },
            Route::EditProject(id) => self.edit_project_interactive(&id)?,
            Route::RequirementDetail {
                project_id,
                requirement_id,
            } => self.show_requirement(&project_id, requirement_id.as_str()),
            Route::Deleted => views::print_deleted_list(self.store.deleted_projects()),
            Route::Settings => views::print_settings(&self.config, self.session.current_user()),
            Route::NotFound(path) => self
                .notifier
                .notify(Notice::error(format!("Page not found: {}", path))),
        }
        Ok(())
    }

    fn project_not_found(&self, id: &EntityId) {
        self.notifier
            .notify(Notice::error(format!("Project not found: {}", id)));
    }

    /// Resolves a requirement key (id or code) to its identity, reporting misses
    fn resolve_requirement(&self, project_id: &EntityId, key: &str) -> Option<EntityId> {
        if self.store.project(project_id).is_none() {
            self.project_not_found(project_id);
            return None;
        }
        let found = self
            .store
            .find_requirement(project_id, key)
            .map(|r| r.id.clone());
        if found.is_none() {
            self.notifier
                .notify(Notice::error(format!("Requirement not found: {}", key)));
        }
        found
    }

    // =========================================================================
    // Projects
    // =========================================================================

    fn handle_project_command(&mut self, cmd: ProjectCommand) -> Result<()> {
        match cmd {
            ProjectCommand::Show { id } => {
                let id = EntityId::from(id);
                match self.store.project(&id) {
                    Some(project) => views::print_project_detail(project),
                    None => self.project_not_found(&id),
                }
            }
            ProjectCommand::New {
                name,
                description,
                status,
                start_date,
                interactive,
            } => {
                // Default to interactive mode if no specific arguments are provided
                let should_be_interactive = interactive
                    || (name.is_none()
                        && description.is_none()
                        && status.is_none()
                        && start_date.is_none());

                if should_be_interactive {
                    self.create_project_interactive()?;
                } else {
                    let name = required_flag(name.as_deref(), "name")?;
                    let description = required_flag(description.as_deref(), "description")?;
                    let start_date = match start_date {
                        Some(s) => parse_date(&s)?,
                        None => Local::now().date_naive(),
                    };
                    let mut draft = ProjectDraft::new(name, description, start_date);
                    if let Some(status) = parse_opt(status.as_ref())? {
                        draft.status = status;
                    }
                    self.create_project(draft);
                }
            }
            ProjectCommand::Edit {
                id,
                name,
                description,
                status,
                start_date,
            } => {
                let id = EntityId::from(id);
                if name.is_none() && description.is_none() && status.is_none() && start_date.is_none()
                {
                    return self.edit_project_interactive(&id);
                }

                let patch = ProjectPatch {
                    name: non_blank(name, "name")?,
                    description: non_blank(description, "description")?,
                    status: parse_opt(status.as_ref())?,
                    start_date: start_date.as_deref().map(parse_date).transpose()?,
                };
                let done = self.store.update_project(&id, &patch);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Project updated successfully!",
                    format!("Project not found: {}", id),
                ));
            }
            ProjectCommand::Delete { id, yes } => {
                let id = EntityId::from(id);
                let Some(project) = self.store.project(&id) else {
                    self.project_not_found(&id);
                    return Ok(());
                };

                println!("{}", "Project to delete:".yellow());
                println!("  ID: {}", project.id);
                println!("  Name: {}", project.name);
                println!("  Requirements: {}", project.requirements.len());

                if !yes && !prompts::confirm("Move this project to the trash?")? {
                    println!("{}", "Deletion cancelled.".yellow());
                    return Ok(());
                }

                let done = self.store.soft_delete_project(&id);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Project moved to trash. Restore it from `deleted`.",
                    format!("Project not found: {}", id),
                ));
            }
            ProjectCommand::Restore { id } => {
                let id = EntityId::from(id);
                let done = self.store.restore_project(&id);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Project restored",
                    format!("No deleted project with ID {}", id),
                ));
            }
            ProjectCommand::Purge { id, yes } => {
                let id = EntityId::from(id);
                let Some(project) = self.store.deleted_project(&id) else {
                    self.notifier
                        .notify(Notice::error(format!("No deleted project with ID {}", id)));
                    return Ok(());
                };

                if !yes {
                    let message = format!("Permanently delete '{}'? This cannot be undone.", project.name);
                    if !prompts::confirm(&message)? {
                        println!("{}", "Deletion cancelled.".yellow());
                        return Ok(());
                    }
                }

                let done = self.store.purge_project(&id);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Project permanently deleted",
                    format!("No deleted project with ID {}", id),
                ));
            }
        }
        Ok(())
    }

    fn create_project(&mut self, draft: ProjectDraft) -> EntityId {
        let id = self.store.create_project(draft);
        self.notifier
            .notify(Notice::success(format!("Project created with ID: {}", id)));
        id
    }

    fn create_project_interactive(&mut self) -> Result<()> {
        let draft = prompts::prompt_new_project()?;
        self.create_project(draft);
        Ok(())
    }

    fn edit_project_interactive(&mut self, id: &EntityId) -> Result<()> {
        let patch = match self.store.project(id) {
            Some(project) => prompts::prompt_project_patch(project)?,
            None => {
                self.project_not_found(id);
                return Ok(());
            }
        };

        if patch.is_empty() {
            println!("{}", "No changes made.".yellow());
            return Ok(());
        }

        let done = self.store.update_project(id, &patch);
        self.notifier.notify(Notice::outcome(
            done,
            "Project updated successfully!",
            format!("Project not found: {}", id),
        ));
        Ok(())
    }

    // =========================================================================
    // Requirements
    // =========================================================================

    fn handle_requirement_command(&mut self, cmd: RequirementCommand) -> Result<()> {
        match cmd {
            RequirementCommand::List {
                project,
                search,
                r#type,
                priority,
                level,
                status,
            } => {
                let filter = RequirementFilter {
                    search,
                    req_type: parse_opt(r#type.as_ref())?,
                    priority: parse_opt(priority.as_ref())?,
                    level: parse_opt(level.as_ref())?,
                    status: parse_opt(status.as_ref())?,
                };
                let id = EntityId::from(project);
                match self.store.project(&id) {
                    Some(project) => {
                        let matching = filter.apply(&project.requirements);
                        views::print_requirement_list(&matching, project.requirements.len());
                    }
                    None => self.project_not_found(&id),
                }
            }
            RequirementCommand::Show { project, id } => {
                self.show_requirement(&EntityId::from(project), &id)
            }
            RequirementCommand::Add {
                project,
                fields,
                interactive,
            } => {
                let project_id = EntityId::from(project);
                let Some(next_code) = self
                    .store
                    .project(&project_id)
                    .map(Project::peek_next_requirement_code)
                else {
                    self.project_not_found(&project_id);
                    return Ok(());
                };

                let draft = if interactive || fields.is_empty() {
                    prompts::prompt_new_requirement(&next_code)?
                } else {
                    requirement_draft(&fields)?
                };

                let created = self.store.create_requirement(&project_id, draft);
                let message = created
                    .as_ref()
                    .and_then(|id| self.store.requirement(&project_id, id))
                    .map(|r| format!("Requirement {} created with ID: {}", r.code, r.id));
                match message {
                    Some(message) => self.notifier.notify(Notice::success(message)),
                    None => self.project_not_found(&project_id),
                }
            }
            RequirementCommand::Edit {
                project,
                id,
                fields,
            } => {
                if fields.is_empty() {
                    anyhow::bail!("Nothing to change; pass at least one field such as --title");
                }
                let patch = requirement_patch(&fields)?;
                let project_id = EntityId::from(project);
                let Some(req_id) = self.resolve_requirement(&project_id, &id) else {
                    return Ok(());
                };

                let done = self.store.update_requirement(&project_id, &req_id, &patch);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Requirement updated successfully!",
                    format!("Requirement not found: {}", id),
                ));
            }
            RequirementCommand::Del { project, id, yes } => {
                let project_id = EntityId::from(project);
                let Some(req_id) = self.resolve_requirement(&project_id, &id) else {
                    return Ok(());
                };

                if let Some(req) = self.store.requirement(&project_id, &req_id) {
                    println!("{}", "Requirement to delete:".yellow());
                    println!("  ID: {}", req.id);
                    println!("  Code: {}", req.code);
                    println!("  Title: {}", req.title);
                }

                if !yes && !prompts::confirm("Are you sure you want to delete this requirement?")? {
                    println!("{}", "Deletion cancelled.".yellow());
                    return Ok(());
                }

                let done = self.store.delete_requirement(&project_id, &req_id);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Requirement deleted successfully!",
                    format!("Requirement not found: {}", id),
                ));
            }
        }
        Ok(())
    }

    fn show_requirement(&self, project_id: &EntityId, key: &str) {
        let Some(project) = self.store.project(project_id) else {
            self.project_not_found(project_id);
            return;
        };
        match project.find_requirement(key) {
            Some(req) => views::print_requirement_detail(project, req),
            None => self
                .notifier
                .notify(Notice::error(format!("Requirement not found: {}", key))),
        }
    }

    // =========================================================================
    // Team
    // =========================================================================

    /// Finds a team member by identity or email
    fn resolve_member(&self, project_id: &EntityId, key: &str) -> Option<EntityId> {
        let Some(project) = self.store.project(project_id) else {
            self.project_not_found(project_id);
            return None;
        };
        let found = project
            .team
            .iter()
            .find(|m| m.id.as_str() == key || m.email.eq_ignore_ascii_case(key))
            .map(|m| m.id.clone());
        if found.is_none() {
            self.notifier
                .notify(Notice::error(format!("Team member not found: {}", key)));
        }
        found
    }

    fn handle_team_command(&mut self, cmd: TeamCommand) -> Result<()> {
        match cmd {
            TeamCommand::List { project } => {
                let id = EntityId::from(project);
                match self.store.project(&id) {
                    Some(project) => views::print_team(&project.team),
                    None => self.project_not_found(&id),
                }
            }
            TeamCommand::Invite { project, email } => {
                let draft = TeamMemberDraft::invite(&email)?;
                let project_id = EntityId::from(project);
                let added = self.store.add_team_member(&project_id, draft);
                self.notifier.notify(Notice::outcome(
                    added.is_some(),
                    format!("Invited {} as viewer", email.trim()),
                    format!("Project not found: {}", project_id),
                ));
            }
            TeamCommand::Role {
                project,
                member,
                role,
            } => {
                let role: MemberRole = role.parse()?;
                let project_id = EntityId::from(project);
                let Some(member_id) = self.resolve_member(&project_id, &member) else {
                    return Ok(());
                };

                let done = self
                    .store
                    .update_team_member(&project_id, &member_id, &TeamMemberPatch::role(role));
                self.notifier.notify(Notice::outcome(
                    done,
                    format!("Role changed to {}", role),
                    format!("Team member not found: {}", member),
                ));
            }
            TeamCommand::Remove {
                project,
                member,
                yes,
            } => {
                let project_id = EntityId::from(project);
                let Some(member_id) = self.resolve_member(&project_id, &member) else {
                    return Ok(());
                };

                if !yes && !prompts::confirm(&format!("Remove {} from the team?", member))? {
                    println!("{}", "Removal cancelled.".yellow());
                    return Ok(());
                }

                let done = self.store.remove_team_member(&project_id, &member_id);
                self.notifier.notify(Notice::outcome(
                    done,
                    "Team member removed",
                    format!("Team member not found: {}", member),
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Comments and activity
    // =========================================================================

    /// Resolves the optional `--req` target of a comment command
    ///
    /// `Err(())` means the target was named but could not be found.
    fn comment_target(
        &self,
        project_id: &EntityId,
        req: Option<&str>,
    ) -> std::result::Result<Option<EntityId>, ()> {
        match req {
            Some(key) => self.resolve_requirement(project_id, key).map(Some).ok_or(()),
            None => Ok(None),
        }
    }

    fn handle_comment_command(&mut self, cmd: CommentCommand) -> Result<()> {
        match cmd {
            CommentCommand::List { project, req } => {
                let project_id = EntityId::from(project);
                let Some(p) = self.store.project(&project_id) else {
                    self.project_not_found(&project_id);
                    return Ok(());
                };
                match req {
                    Some(key) => match p.find_requirement(&key) {
                        Some(r) => views::print_comments(&r.comments),
                        None => self
                            .notifier
                            .notify(Notice::error(format!("Requirement not found: {}", key))),
                    },
                    None => views::print_comments(&p.comments),
                }
            }
            CommentCommand::Add {
                project,
                content,
                req,
                parent,
            } => {
                let project_id = EntityId::from(project);
                if self.store.project(&project_id).is_none() {
                    self.project_not_found(&project_id);
                    return Ok(());
                }
                let Ok(target) = self.comment_target(&project_id, req.as_deref()) else {
                    return Ok(());
                };

                let content = match content {
                    Some(c) if !c.trim().is_empty() => c,
                    _ => prompts::prompt_comment()?,
                };

                let author_id = self
                    .session
                    .current_user()
                    .map(|u| u.email.clone())
                    .unwrap_or_default();
                let actor = self.store.actor();
                let mut draft = CommentDraft::new(author_id, actor.name.clone(), content);
                draft.author_avatar = actor.avatar.clone();
                if let Some(parent) = parent {
                    draft = draft.reply_to(EntityId::from(parent));
                }

                let added = self
                    .store
                    .add_comment(&project_id, target.as_ref(), draft);
                match added {
                    Some(id) => self
                        .notifier
                        .notify(Notice::success(format!("Comment added with ID: {}", id))),
                    None => self
                        .notifier
                        .notify(Notice::error("Comment could not be added")),
                }
            }
            CommentCommand::Del {
                project,
                comment,
                req,
            } => {
                let project_id = EntityId::from(project);
                if self.store.project(&project_id).is_none() {
                    self.project_not_found(&project_id);
                    return Ok(());
                }
                let Ok(target) = self.comment_target(&project_id, req.as_deref()) else {
                    return Ok(());
                };

                let done = self.store.delete_comment(
                    &project_id,
                    target.as_ref(),
                    &EntityId::from(comment.as_str()),
                );
                self.notifier.notify(Notice::outcome(
                    done,
                    "Comment deleted",
                    format!("Comment not found: {}", comment),
                ));
            }
        }
        Ok(())
    }

    fn show_activity(&self, project: &str, req: Option<&str>) {
        let project_id = EntityId::from(project);
        let Some(p) = self.store.project(&project_id) else {
            self.project_not_found(&project_id);
            return;
        };
        match req {
            Some(key) => match p.find_requirement(key) {
                Some(r) => views::print_activity(&r.activity_log),
                None => self
                    .notifier
                    .notify(Notice::error(format!("Requirement not found: {}", key))),
            },
            None => views::print_activity(&p.activity_log),
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    fn handle_settings(
        &mut self,
        actor_name: Option<String>,
        actor_avatar: Option<String>,
        save: bool,
    ) -> Result<()> {
        let changed = actor_name.is_some() || actor_avatar.is_some();
        if let Some(name) = actor_name {
            self.config.actor_name = name;
        }
        if let Some(avatar) = actor_avatar {
            self.config.actor_avatar = (!avatar.trim().is_empty()).then_some(avatar);
        }
        if changed {
            self.store.set_actor(self.config.actor());
            self.notifier.notify(Notice::success("Settings updated"));
        }

        if save {
            self.config.save(&self.config_path)?;
            self.notifier.notify(Notice::success(format!(
                "Settings saved to {}",
                self.config_path.display()
            )));
        }

        views::print_settings(&self.config, self.session.current_user());
        Ok(())
    }

    #[cfg(test)]
    fn store(&self) -> &ProjectStore {
        &self.store
    }
}
