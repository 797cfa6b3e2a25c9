use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::comments::CommentThread;
use crate::error::Error;
use crate::filter::RequirementCounts;
use crate::models::{ActivityLog, Comment, Project, Requirement};
use crate::store::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialized shape of a snapshot
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    revision: u64,
    projects: Vec<&'a Project>,
    deleted_projects: Vec<&'a Project>,
}

impl<'a> ExportDocument<'a> {
    fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        Self {
            revision: snapshot.revision,
            projects: snapshot.active.iter().map(|p| p.as_ref()).collect(),
            deleted_projects: snapshot.deleted.iter().map(|p| p.as_ref()).collect(),
        }
    }
}

/// Renders a snapshot in the requested format
pub fn render(snapshot: &Snapshot, format: ExportFormat) -> Result<String> {
    let doc = ExportDocument::from_snapshot(snapshot);
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&doc)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(&doc)?),
        ExportFormat::Markdown => Ok(render_markdown(&doc)),
    }
}

/// Renders a snapshot and writes it to `output_path`
pub fn export_to_file(snapshot: &Snapshot, format: ExportFormat, output_path: &Path) -> Result<()> {
    let content = render(snapshot, format)?;
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write export to {:?}", output_path))?;

    tracing::info!(
        path = %output_path.display(),
        projects = snapshot.active.len(),
        "snapshot exported"
    );
    Ok(())
}

fn render_markdown(doc: &ExportDocument<'_>) -> String {
    let mut output = String::new();
    output.push_str("# Projects\n\n");

    if doc.projects.is_empty() {
        output.push_str("_No active projects._\n\n");
    }
    for project in &doc.projects {
        write_project(&mut output, project);
    }

    if !doc.deleted_projects.is_empty() {
        output.push_str("# Deleted Projects\n\n");
        for project in &doc.deleted_projects {
            let deleted = project
                .deleted_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            output.push_str(&format!("- **{}** (deleted {})\n", project.name, deleted));
        }
        output.push('\n');
    }

    output
}

fn write_project(output: &mut String, project: &Project) {
    let counts = RequirementCounts::of(project);

    output.push_str(&format!("## {}\n\n", project.name));
    if !project.description.is_empty() {
        output.push_str(&format!("{}\n\n", project.description));
    }
    output.push_str(&format!("- **Status:** {}\n", project.status));
    output.push_str(&format!("- **Start date:** {}\n", project.start_date));
    output.push_str(&format!(
        "- **Requirements:** {} ({} pending, {} in progress, {} completed, {} rejected)\n\n",
        counts.total, counts.pending, counts.in_progress, counts.completed, counts.rejected
    ));

    if !project.requirements.is_empty() {
        output.push_str("| Code | Title | Status | Priority | Type | Level |\n");
        output.push_str("|------|-------|--------|----------|------|-------|\n");
        for req in &project.requirements {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                req.code,
                req.title,
                req.status,
                req.priority,
                req.req_type.map(|t| t.to_string()).unwrap_or_default(),
                req.level.map(|l| l.to_string()).unwrap_or_default(),
            ));
        }
        output.push('\n');

        for req in &project.requirements {
            write_requirement(output, req);
        }
    }

    if !project.team.is_empty() {
        output.push_str("### Team\n\n");
        for member in &project.team {
            output.push_str(&format!(
                "- {} <{}> ({})\n",
                member.name, member.email, member.role
            ));
        }
        output.push('\n');
    }

    if !project.comments.is_empty() {
        output.push_str("### Discussion\n\n");
        write_comments(output, &project.comments);
    }

    if !project.activity_log.is_empty() {
        output.push_str("### Activity\n\n");
        write_activity(output, &project.activity_log);
    }
}

fn write_requirement(output: &mut String, req: &Requirement) {
    output.push_str(&format!("### {}: {}\n\n", req.code, req.title));
    output.push_str(&format!("{}\n\n", req.statement));
    if let Some(rationale) = &req.rationale {
        output.push_str(&format!("_Rationale:_ {}\n\n", rationale));
    }

    if !req.comments.is_empty() {
        output.push_str("#### Discussion\n\n");
        write_comments(output, &req.comments);
    }

    if !req.activity_log.is_empty() {
        output.push_str("#### Activity\n\n");
        write_activity(output, &req.activity_log);
    }
}

fn write_comments(output: &mut String, comments: &[Comment]) {
    for (depth, comment) in CommentThread::build(comments).walk() {
        output.push_str(&format!(
            "{}- **{}**: {}\n",
            "  ".repeat(depth),
            comment.author_name,
            comment.content
        ));
    }
    output.push('\n');
}

fn write_activity(output: &mut String, entries: &[ActivityLog]) {
    for entry in entries {
        output.push_str(&format!(
            "- {} {} _{}_",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.performed_by,
            entry.action
        ));
        if let Some(details) = &entry.details {
            output.push_str(&format!(": {}", details));
        }
        output.push('\n');
        for change in &entry.changes {
            output.push_str(&format!(
                "  - {}: {} -> {}\n",
                change.field, change.from, change.to
            ));
        }
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Actor, CommentDraft, EntityId, RequirementPatch, RequirementStatus};
    use crate::seed::seed_store;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("yml".parse::<ExportFormat>(), Ok(ExportFormat::Yaml));
        assert_eq!("md".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!(
            "csv".parse::<ExportFormat>(),
            Err(Error::UnsupportedFormat("csv".into()))
        );
    }

    #[test]
    fn test_json_export_contains_both_collections() {
        let store = seed_store(Actor::default());
        let json = render(&store.snapshot(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["projects"].as_array().unwrap().len(), 2);
        assert_eq!(value["deleted_projects"][0]["id"], "3");
        assert_eq!(value["projects"][0]["requirements"][1]["status"], "in-progress");
        assert_eq!(value["projects"][0]["requirements"][0]["type"], "non-functional");
    }

    #[test]
    fn test_markdown_export() {
        let store = seed_store(Actor::default());
        let md = render(&store.snapshot(), ExportFormat::Markdown).unwrap();

        assert!(md.contains("## Website Redesign"));
        assert!(md.contains("| REQ-002 | SEO Optimization | in-progress | high |"));
        assert!(md.contains("- Bob Wilson <bob@example.com> (editor)"));
        assert!(md.contains("  - **Jane Smith**: Will do!"));
        assert!(md.contains("- **Legacy System Migration** (deleted 2024-01-01)"));
    }

    #[test]
    fn test_markdown_export_includes_requirement_discussion_and_activity() {
        let mut store = seed_store(Actor::new("Jane Smith"));
        let project_id = EntityId::from("1");
        let req_id = EntityId::from("3");
        let patch = RequirementPatch {
            status: Some(RequirementStatus::InProgress),
            ..Default::default()
        };
        assert!(store.update_requirement(&project_id, &req_id, &patch));
        let draft = CommentDraft::new("u9", "Sam Lee", "Use OAuth please");
        assert!(store.add_comment(&project_id, Some(&req_id), draft).is_some());

        let md = render(&store.snapshot(), ExportFormat::Markdown).unwrap();
        let section = &md[md.find("### REQ-003: User Authentication").unwrap()..];
        let section = &section[..section.find("### Team").unwrap()];

        assert!(section.contains("#### Discussion"));
        assert!(section.contains("- **Sam Lee**: Use OAuth please"));
        assert!(section.contains("#### Activity"));
        assert!(section.contains("Jane Smith _status_changed_: Requirement updated"));
        assert!(section.contains("  - status: pending -> in-progress"));
    }

    #[test]
    fn test_export_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.yaml");
        let store = seed_store(Actor::default());

        export_to_file(&store.snapshot(), ExportFormat::Yaml, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Mobile App Development"));
    }
}
