use anyhow::Result;
use chrono::Local;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, Select, Text};
use std::fmt::Display;
use std::str::FromStr;

use reqtrack_core::{
    parse_date, Priority, Project, ProjectDraft, ProjectPatch, ProjectStatus, RequirementDraft,
    RequirementLevel, RequirementStatus, RequirementType, RiskLevel,
};

const NONE_OPTION: &str = "(none)";

/// Rejects blank input for required form fields
fn required(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("This field is required".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn valid_date(input: &str) -> Result<Validation, CustomUserError> {
    match parse_date(input) {
        Ok(_) => Ok(Validation::Valid),
        Err(e) => Ok(Validation::Invalid(e.to_string().into())),
    }
}

fn prompt_required(label: &str) -> Result<String> {
    let value = Text::new(label).with_validator(required).prompt()?;
    Ok(value.trim().to_string())
}

fn prompt_optional(label: &str) -> Result<Option<String>> {
    let value = Text::new(label).prompt()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Select one of `options` with an extra "(none)" entry
fn select_optional<T>(label: &str, options: &[T]) -> Result<Option<T>>
where
    T: Display + FromStr + Copy,
{
    let mut choices = vec![NONE_OPTION.to_string()];
    choices.extend(options.iter().map(|o| o.to_string()));

    let choice = Select::new(label, choices).prompt()?;
    Ok(choice.parse().ok())
}

/// Prompts the user for a new project
pub fn prompt_new_project() -> Result<ProjectDraft> {
    let name = prompt_required("Name:")?;
    let description = prompt_required("Description:")?;
    let status = Select::new("Status:", ProjectStatus::ALL.to_vec()).prompt()?;

    let today = Local::now().date_naive().to_string();
    let start = Text::new("Start date (YYYY-MM-DD):")
        .with_default(&today)
        .with_validator(valid_date)
        .prompt()?;

    let mut draft = ProjectDraft::new(name, description, parse_date(&start)?);
    draft.status = status;
    Ok(draft)
}

/// Prompts for new values of a project's fields, prefilled with the current ones
///
/// Only fields whose answer differs from the current value end up in the patch.
pub fn prompt_project_patch(project: &Project) -> Result<ProjectPatch> {
    let name = Text::new("Name:")
        .with_default(&project.name)
        .with_validator(required)
        .prompt()?;
    let description = Text::new("Description:")
        .with_default(&project.description)
        .with_validator(required)
        .prompt()?;

    let cursor = ProjectStatus::ALL
        .iter()
        .position(|s| *s == project.status)
        .unwrap_or(0);
    let status = Select::new("Status:", ProjectStatus::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    let current_start = project.start_date.to_string();
    let start = Text::new("Start date (YYYY-MM-DD):")
        .with_default(&current_start)
        .with_validator(valid_date)
        .prompt()?;
    let start_date = parse_date(&start)?;

    let name = name.trim().to_string();
    let description = description.trim().to_string();
    Ok(ProjectPatch {
        name: (name != project.name).then_some(name),
        description: (description != project.description).then_some(description),
        status: (status != project.status).then_some(status),
        start_date: (start_date != project.start_date).then_some(start_date),
    })
}

/// Prompts the user for a new requirement
pub fn prompt_new_requirement(next_code: &str) -> Result<RequirementDraft> {
    println!("New requirement {}", next_code);

    let title = prompt_required("Title:")?;
    let description = prompt_required("Description:")?;
    let mut req = RequirementDraft::new(title, description);

    req.statement = prompt_optional("Statement (blank to use the description):")?.unwrap_or_default();
    req.rationale = prompt_optional("Rationale:")?;
    req.req_type = select_optional("Type:", &RequirementType::ALL)?;
    req.level = select_optional("Level:", &RequirementLevel::ALL)?;
    req.risk = select_optional("Risk:", &RiskLevel::ALL)?;
    req.priority = Select::new("Priority:", Priority::ALL.to_vec())
        .with_starting_cursor(1)
        .prompt()?;
    req.status = Select::new("Status:", RequirementStatus::ALL.to_vec()).prompt()?;

    Ok(req)
}

/// Prompts for comment text
pub fn prompt_comment() -> Result<String> {
    prompt_required("Comment:")
}

/// Asks for confirmation, defaulting to no
pub fn confirm(message: &str) -> Result<bool> {
    Ok(Confirm::new(message).with_default(false).prompt()?)
}

/// Reads one line at the shell prompt
pub fn prompt_shell_line(user: Option<&str>) -> Result<String, inquire::InquireError> {
    let label = match user {
        Some(email) => format!("reqtrack ({})>", email),
        None => "reqtrack>".to_string(),
    };
    Text::new(&label).prompt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank_input() {
        assert!(matches!(required("   ").unwrap(), Validation::Invalid(_)));
        assert!(matches!(required("").unwrap(), Validation::Invalid(_)));
        assert!(matches!(required("Website").unwrap(), Validation::Valid));
    }

    #[test]
    fn test_valid_date() {
        assert!(matches!(valid_date("2024-01-15").unwrap(), Validation::Valid));
        assert!(matches!(valid_date("15/01/2024").unwrap(), Validation::Invalid(_)));
    }
}
