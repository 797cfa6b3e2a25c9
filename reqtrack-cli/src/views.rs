//! Terminal rendering of store snapshots

use colored::{ColoredString, Colorize};
use std::sync::Arc;

use reqtrack_core::{
    ActivityLog, Comment, CommentThread, Config, MemberRole, Priority, Project, ProjectStatus,
    Requirement, RequirementCounts, RequirementStatus, TeamMember, User,
};

fn project_status(status: ProjectStatus) -> ColoredString {
    match status {
        ProjectStatus::Active => status.to_string().green(),
        ProjectStatus::OnHold => status.to_string().yellow(),
        ProjectStatus::Completed => status.to_string().blue(),
    }
}

fn requirement_status(status: RequirementStatus) -> ColoredString {
    match status {
        RequirementStatus::Pending => status.to_string().yellow(),
        RequirementStatus::InProgress => status.to_string().blue(),
        RequirementStatus::Completed => status.to_string().green(),
        RequirementStatus::Rejected => status.to_string().red(),
    }
}

fn priority(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.to_string().red(),
        Priority::Medium => priority.to_string().yellow(),
        Priority::Low => priority.to_string().green(),
    }
}

fn role(role: MemberRole) -> ColoredString {
    match role {
        MemberRole::Owner => role.to_string().magenta(),
        MemberRole::Admin => role.to_string().red(),
        MemberRole::Editor => role.to_string().blue(),
        MemberRole::Viewer => role.to_string().normal(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

pub fn print_project_list(projects: &[Arc<Project>]) {
    if projects.is_empty() {
        println!("{}", "No projects yet. Create one with `project new`.".yellow());
        return;
    }

    println!(
        "{:<38} | {:<30} | {:<10} | {:<12} | {:<8}",
        "ID", "Name", "Status", "Start", "Reqs"
    );
    println!("{}", "-".repeat(110));

    for project in projects {
        let counts = RequirementCounts::of(project);
        println!(
            "{:<38} | {:<30} | {:<10} | {:<12} | {:<8}",
            project.id.as_str(),
            truncate(&project.name, 30),
            project_status(project.status),
            project.start_date.to_string(),
            format!("{}/{}", counts.completed, counts.total),
        );
    }
}

pub fn print_deleted_list(projects: &[Arc<Project>]) {
    if projects.is_empty() {
        println!("{}", "Trash is empty.".dimmed());
        return;
    }

    println!("{:<38} | {:<30} | {:<12} | {:<8}", "ID", "Name", "Deleted", "Reqs");
    println!("{}", "-".repeat(100));

    for project in projects {
        let deleted = project
            .deleted_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:<38} | {:<30} | {:<12} | {:<8}",
            project.id.as_str(),
            truncate(&project.name, 30),
            deleted,
            project.requirements.len(),
        );
    }
}

pub fn print_project_detail(project: &Project) {
    println!("{}", project.name.bold());
    println!("{}: {}", "ID".blue(), project.id);
    println!("{}: {}", "Description".blue(), project.description);
    println!("{}: {}", "Status".blue(), project_status(project.status));
    println!("{}: {}", "Start Date".blue(), project.start_date);
    println!("{}: {}", "Created".blue(), project.created_at.format("%Y-%m-%d"));
    println!();

    println!("{}", "Requirements".green().bold());
    let reqs: Vec<&Requirement> = project.requirements.iter().collect();
    print_requirement_list(&reqs, project.requirements.len());
    println!();

    println!("{}", "Team".green().bold());
    print_team(&project.team);
    println!();

    println!("{}", "Comments".green().bold());
    print_comments(&project.comments);
    println!();

    println!("{}", "Activity".green().bold());
    print_activity(&project.activity_log);
}

pub fn print_requirement_list(requirements: &[&Requirement], total: usize) {
    if requirements.is_empty() {
        if total == 0 {
            println!("{}", "No requirements yet.".yellow());
        } else {
            println!("{}", "No requirements match your filters.".yellow());
        }
        return;
    }

    println!(
        "{:<8} | {:<38} | {:<30} | {:<11} | {:<8} | {:<14}",
        "Code", "ID", "Title", "Status", "Priority", "Type"
    );
    println!("{}", "-".repeat(125));

    for req in requirements {
        println!(
            "{:<8} | {:<38} | {:<30} | {:<11} | {:<8} | {:<14}",
            req.code,
            req.id.as_str(),
            truncate(&req.title, 30),
            requirement_status(req.status),
            priority(req.priority),
            req.req_type.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    println!("{} of {} shown", requirements.len(), total);
}

pub fn print_requirement_detail(project: &Project, req: &Requirement) {
    println!("{} {}", req.code.green(), req.title.bold());
    println!("{}: {}", "Project".blue(), project.name);
    println!("{}: {}", "ID".blue(), req.id);
    println!("{}: {}", "Statement".blue(), req.statement);
    println!("{}: {}", "Description".blue(), req.description);
    if let Some(rationale) = &req.rationale {
        println!("{}: {}", "Rationale".blue(), rationale);
    }
    println!("{}: {}", "Status".blue(), requirement_status(req.status));
    println!("{}: {}", "Priority".blue(), priority(req.priority));
    if let Some(t) = req.req_type {
        println!("{}: {}", "Type".blue(), t);
    }
    if let Some(level) = req.level {
        println!("{}: {}", "Level".blue(), level);
    }
    if let Some(risk) = req.risk {
        println!("{}: {}", "Risk".blue(), risk);
    }
    println!("{}: {}", "Created".blue(), req.created_at.format("%Y-%m-%d %H:%M"));
    let updated = req
        .updated_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Never".to_string());
    println!("{}: {}", "Updated".blue(), updated);
    println!();

    println!("{}", "Comments".green().bold());
    print_comments(&req.comments);
    println!();

    println!("{}", "Activity".green().bold());
    print_activity(&req.activity_log);
}

pub fn print_team(team: &[TeamMember]) {
    if team.is_empty() {
        println!("{}", "No team members yet.".dimmed());
        return;
    }

    for member in team {
        println!(
            "  {:<38} {:<20} {:<28} {}",
            member.id.as_str().dimmed(),
            member.name,
            member.email,
            role(member.role)
        );
    }
}

pub fn print_comments(comments: &[Comment]) {
    if comments.is_empty() {
        println!("{}", "No comments yet".dimmed());
        return;
    }

    for (depth, comment) in CommentThread::build(comments).walk() {
        print_comment(comment, depth);
    }
}

fn print_comment(comment: &Comment, indent: usize) {
    let indent_str = "  ".repeat(indent);
    println!();
    println!("{}{}:", indent_str, comment.id.as_str().yellow());
    println!(
        "{}  {} {} at {}",
        indent_str,
        "By:".dimmed(),
        comment.author_name.cyan(),
        comment
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed()
    );
    println!("{}  {}", indent_str, comment.content);
}

pub fn print_activity(entries: &[ActivityLog]) {
    if entries.is_empty() {
        println!("{}", "No activity yet".dimmed());
        return;
    }

    // Newest first
    for entry in entries.iter().rev() {
        println!(
            "  {} {} {}{}",
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            entry.performed_by.cyan(),
            entry.action.to_string().bold(),
            entry
                .details
                .as_deref()
                .map(|d| format!(" - {}", d))
                .unwrap_or_default()
        );
        for change in &entry.changes {
            println!(
                "      {}: {} {} {}",
                change.field,
                change.from.red(),
                "→".dimmed(),
                change.to.green()
            );
        }
    }
}

pub fn print_settings(config: &Config, user: Option<&User>) {
    println!("{}", "Settings".bold());
    println!(
        "{}: {}",
        "Signed in as".blue(),
        user.map(|u| u.email.as_str()).unwrap_or("(nobody)")
    );
    println!("{}: {}", "Actor name".blue(), config.actor_name);
    println!(
        "{}: {}",
        "Actor avatar".blue(),
        config.actor_avatar.as_deref().unwrap_or("-")
    );
    println!("{}: {}", "Seed data".blue(), config.seed_data);
    println!("{}: {}", "Log level".blue(), config.log_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long project name", 6), "a lon…");
    }
}
