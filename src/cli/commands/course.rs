//! Course command handler

use super::{open_store, read_optional_input, report_failure, to_index};
use crate::args::CourseSubcommand;
use gradeplan::config::Config;
use gradeplan::core::editing::{CourseEdit, CourseField, CourseRef};
use gradeplan::debug;
use std::path::Path;

/// Dispatch course subcommands
pub fn run(subcommand: CourseSubcommand, config: &Config) {
    let result = match subcommand {
        CourseSubcommand::Add { semester, from } => add(&semester, from.as_deref(), config),
        CourseSubcommand::Edit {
            semester,
            index,
            field,
            value,
        } => edit(&semester, index, &field, &value, config),
        CourseSubcommand::Remove { semester, index } => remove(&semester, index, config),
        CourseSubcommand::Move { semester, from, to } => move_course(&semester, from, to, config),
    };
    if let Err(err) = result {
        report_failure("Course command", &err);
    }
}

fn add(selector: &str, from: Option<&Path>, config: &Config) -> Result<(), String> {
    let text = read_optional_input(from)?;
    let parser = config.course_parser();
    let store = open_store(config);

    let (first, total) = store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            let first = gradebook.add_courses(&id, &text, &parser)?;
            let total = gradebook.find(&id).map_or(0, |s| s.courses.len());
            Ok((first, total))
        })
        .map_err(|e| format!("✗ {e}"))?;

    let added = total - first;
    if text.trim().is_empty() {
        println!("✓ Added a blank course at position {}", first + 1);
    } else {
        println!("✓ Added {added} course(s) starting at position {}", first + 1);
    }
    Ok(())
}

fn edit(
    selector: &str,
    position: usize,
    field: &str,
    value: &str,
    config: &Config,
) -> Result<(), String> {
    let field: CourseField = field.parse().map_err(|e| format!("✗ {e}"))?;
    let index = to_index(position)?;
    let scale = config.grade_scale();
    let store = open_store(config);

    let summary = store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            let edit = CourseEdit::new(CourseRef::new(id.clone(), index), field, value);
            gradebook.apply_edit(&edit, &scale)?;
            Ok(gradebook.find(&id).map(|s| (s.name.clone(), s.gpa)))
        })
        .map_err(|e| format!("✗ {e}"))?;

    if let Some((name, gpa)) = summary {
        debug!("Semester '{name}' GPA after edit: {gpa:.2}");
        println!("✓ Updated {field} of course {position} in '{name}' (semester GPA {gpa:.2})");
    }
    Ok(())
}

fn remove(selector: &str, position: usize, config: &Config) -> Result<(), String> {
    let index = to_index(position)?;
    let store = open_store(config);
    let removed = store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            gradebook.remove_course(&CourseRef::new(id, index))
        })
        .map_err(|e| format!("✗ {e}"))?;
    println!("✓ Removed {} {}", removed.id, removed.title);
    Ok(())
}

fn move_course(selector: &str, from: usize, to: usize, config: &Config) -> Result<(), String> {
    let (from_idx, to_idx) = (to_index(from)?, to_index(to)?);
    let store = open_store(config);
    store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            gradebook.move_course(&id, from_idx, to_idx)
        })
        .map_err(|e| format!("✗ {e}"))?;
    println!("✓ Moved course from position {from} to {to}");
    Ok(())
}
